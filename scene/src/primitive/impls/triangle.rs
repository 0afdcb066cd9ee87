//! 三角形のプリミティブを定義するモジュール。

use std::sync::Arc;

use math::{Aabb, Ray};

use crate::{Hit, MeshData, Primitive, Vertex};

/// 三角形のプリミティブ。
/// 頂点データ・変換・マテリアルは属するメッシュと共有し、
/// 自身は3つの頂点インデックスとシェーディングのフラグのみを持つ。
pub struct Triangle {
    mesh: Arc<MeshData>,
    indices: [u32; 3],
    smooth: bool,
}
impl Triangle {
    /// 三角形を作成する。
    pub fn new(mesh: Arc<MeshData>, indices: [u32; 3], smooth: bool) -> Self {
        Self {
            mesh,
            indices,
            smooth,
        }
    }

    /// 頂点を取得する。
    #[inline(always)]
    fn vertex(&self, local_index: usize) -> &Vertex {
        &self.mesh.vertices[self.indices[local_index] as usize]
    }
}
impl Primitive for Triangle {
    /// Moller-Trumboreのアルゴリズムでローカル座標系で交差判定を行う。
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let local_ray = self.mesh.transform.inverse_transform_ray(ray);

        let p0 = self.vertex(0).position;
        let p1 = self.vertex(1).position;
        let p2 = self.vertex(2).position;

        let edge1 = p1 - p0;
        let edge2 = p2 - p0;
        let p = local_ray.dir.cross(edge2);

        let det = p.dot(edge1);
        if det.abs() < 1e-7 {
            return None;
        }
        let inv_det = 1.0 / det;

        let t_vec = local_ray.origin - p0;
        let u = t_vec.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = t_vec.cross(edge1);
        let v = local_ray.dir.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        if t < 1e-7 {
            return None;
        }

        // 法線はスムーズシェーディングなら頂点法線のbarycentric補間、
        // フラットシェーディングなら面法線。
        let local_normal = if self.smooth {
            let n0 = self.vertex(0).normal;
            let n1 = self.vertex(1).normal;
            let n2 = self.vertex(2).normal;
            (n0 * (1.0 - u - v) + n1 * u + n2 * v).normalize()
        } else {
            edge1.cross(edge2).normalize()
        };

        let position = self.mesh.transform.transform_position(local_ray.at(t));
        let normal = self
            .mesh
            .transform
            .transform_direction(local_normal)
            .normalize();
        // 別の変換を持つプリミティブと深度を比較できるよう、ワールド座標系で測り直す。
        let depth = (position - ray.origin).length();

        Some(Hit::new(position, normal, depth, self.mesh.material))
    }

    fn bounding_box(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for local_index in 0..3 {
            bounds.grow(
                self.mesh
                    .transform
                    .transform_position(self.vertex(local_index).position),
            );
        }
        bounds
    }
}
