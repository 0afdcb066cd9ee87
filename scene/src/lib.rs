//! シーンを表す構造体とその構成要素を定義するクレート。
//! プリミティブ、マテリアル、メッシュ、BVH、テクスチャ、BRDFを含む。

mod brdf;
mod bvh;
mod error;
mod material;
mod mesh;
mod primitive;
mod scene;
mod texture;

pub use brdf::{BlinnPhong, Brdf, BrdfEval, CookTorrance};
pub use bvh::{Bvh, BvhNode};
pub use error::SceneError;
pub use material::{Material, MaterialIndex, MaterialKind, MaterialRepository};
pub use mesh::{MeshData, TriangleMesh, Vertex};
pub use primitive::{Cuboid, Hit, Light, Plane, Primitive, PrimitiveIndex, Sphere, SphereLight, Triangle};
pub use scene::Scene;
pub use texture::{Texel, Texture};
