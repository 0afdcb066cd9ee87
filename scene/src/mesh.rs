//! 三角形メッシュのOBJファイルアダプタを定義するモジュール。
//! 読み込んだメッシュはシーンに追加するときに
//! 変換とマテリアルを共有する個別の三角形プリミティブに展開される。

use std::path::Path;
use std::sync::Arc;

use glam::{DVec2, DVec3};
use math::Transform;

use crate::{MaterialIndex, SceneError};

/// メッシュの頂点。
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: DVec3,
    pub normal: DVec3,
    pub uv: DVec2,
}

/// 展開された三角形プリミティブが共有するメッシュのデータ。
/// 頂点は1つの配列に集約し、三角形はインデックスで参照する。
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub transform: Transform,
    pub material: MaterialIndex,
}

/// OBJファイルから読み込んだ三角形メッシュ。
pub struct TriangleMesh {
    vertices: Vec<Vertex>,
    faces: Vec<[u32; 3]>,
}
impl TriangleMesh {
    /// OBJファイルを読み込み新しい三角形メッシュを作成する。
    /// 頂点法線がファイルに無い場合は面法線の合計を正規化して計算する。
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ignore_points: true,
                ignore_lines: true,
            },
        )
        .map_err(|source| SceneError::MeshLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let mut vertices = vec![];
        let mut faces = vec![];
        let mut has_normals = true;

        for model in models {
            let mesh = model.mesh;
            let base = vertices.len() as u32;

            has_normals &= !mesh.normals.is_empty();
            for (index, position) in mesh.positions.chunks(3).enumerate() {
                let normal = if mesh.normals.is_empty() {
                    DVec3::ZERO
                } else {
                    let n = &mesh.normals[index * 3..index * 3 + 3];
                    DVec3::new(n[0] as f64, n[1] as f64, n[2] as f64)
                };
                let uv = if mesh.texcoords.is_empty() {
                    DVec2::ZERO
                } else {
                    let uv = &mesh.texcoords[index * 2..index * 2 + 2];
                    DVec2::new(uv[0] as f64, uv[1] as f64)
                };
                vertices.push(Vertex {
                    position: DVec3::new(
                        position[0] as f64,
                        position[1] as f64,
                        position[2] as f64,
                    ),
                    normal,
                    uv,
                });
            }

            faces.extend(
                mesh.indices
                    .chunks(3)
                    .map(|face| [base + face[0], base + face[1], base + face[2]]),
            );
        }

        let mut mesh = Self { vertices, faces };
        if !has_normals {
            mesh.compute_vertex_normals();
        }

        log::info!(
            "loaded mesh {:?}: {} vertices, {} faces",
            path,
            mesh.vertex_count(),
            mesh.face_count()
        );

        Ok(mesh)
    }

    /// 頂点と面から三角形メッシュを作成し、頂点法線を計算する。
    pub fn from_raw(positions: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Self {
        let vertices = positions
            .into_iter()
            .map(|position| Vertex {
                position,
                normal: DVec3::ZERO,
                uv: DVec2::ZERO,
            })
            .collect();
        let mut mesh = Self { vertices, faces };
        mesh.compute_vertex_normals();
        mesh
    }

    /// 頂点数を返す。
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 面数を返す。
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// 頂点を取得する。
    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    /// 面を取得する。
    pub fn face(&self, index: usize) -> [u32; 3] {
        self.faces[index]
    }

    /// 各頂点の法線を、接続する面の面法線の合計の正規化として計算する。
    fn compute_vertex_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = DVec3::ZERO;
        }

        for face in &self.faces {
            let p0 = self.vertices[face[0] as usize].position;
            let p1 = self.vertices[face[1] as usize].position;
            let p2 = self.vertices[face[2] as usize].position;
            let face_normal = (p1 - p0).cross(p2 - p0);

            for index in face {
                self.vertices[*index as usize].normal += face_normal;
            }
        }

        for vertex in &mut self.vertices {
            if vertex.normal.length_squared() > 0.0 {
                vertex.normal = vertex.normal.normalize();
            }
        }
    }

    /// シーンへ展開するための共有データと面リストに分解する。
    /// 退化した面とNaNを含む面は警告を出して取り除く。
    pub(crate) fn into_shared(
        self,
        transform: Transform,
        material: MaterialIndex,
    ) -> (Arc<MeshData>, Vec<[u32; 3]>) {
        let mut faces = Vec::with_capacity(self.faces.len());
        for face in &self.faces {
            let p0 = self.vertices[face[0] as usize].position;
            let p1 = self.vertices[face[1] as usize].position;
            let p2 = self.vertices[face[2] as usize].position;

            if !(p0.is_finite() && p1.is_finite() && p2.is_finite()) {
                log::warn!("skipping face with non-finite vertex data: {face:?}");
                continue;
            }
            if (p1 - p0).cross(p2 - p0).length_squared() == 0.0 {
                log::warn!("skipping zero-area face: {face:?}");
                continue;
            }
            faces.push(*face);
        }

        let data = Arc::new(MeshData {
            vertices: self.vertices,
            transform,
            material,
        });
        (data, faces)
    }
}
