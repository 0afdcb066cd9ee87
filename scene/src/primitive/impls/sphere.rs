//! 球のプリミティブを定義するモジュール。

use glam::DVec3;
use math::{Aabb, Ray, Transform};

use crate::{Hit, MaterialIndex, Primitive};

/// ローカル座標系の原点を中心とする球のプリミティブ。
pub struct Sphere {
    transform: Transform,
    radius: f64,
    material: MaterialIndex,
}
impl Sphere {
    /// 球を作成する。
    pub fn new(transform: Transform, radius: f64, material: MaterialIndex) -> Self {
        Self {
            transform,
            radius,
            material,
        }
    }

    /// 球の半径を取得する。
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// 球の中心のワールド座標を取得する。
    pub fn center(&self) -> DVec3 {
        self.transform.translation()
    }
}
impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let local_ray = self.transform.inverse_transform_ray(ray);

        // レイの原点から球の中心へのベクトル。
        let l = -local_ray.origin;

        let tca = l.dot(local_ray.dir);
        if tca < 0.0 {
            return None;
        }

        // 球の中心とレイの距離の2乗。
        let d2 = l.dot(l) - tca * tca;
        if d2 > self.radius * self.radius {
            return None;
        }

        let half_inner = (self.radius * self.radius - d2).sqrt();
        let t0 = tca - half_inner;
        let t1 = tca + half_inner;

        // 近い方の根が負ならレイの原点は球の内側にあり、遠い方の根を使う。
        let (t, inside) = if t0 < 0.0 {
            if t1 < 0.0 {
                return None;
            }
            (t1, true)
        } else {
            (t0, false)
        };

        let position = self.transform.transform_position(local_ray.at(t));
        let normal = (position - self.center()).normalize();
        let normal = if inside { -normal } else { normal };
        let depth = (position - ray.origin).length();

        Some(Hit::new(position, normal, depth, self.material))
    }

    fn bounding_box(&self) -> Aabb {
        let scale = self.transform.scale();
        let radius = self.radius * scale.x.abs().max(scale.y.abs()).max(scale.z.abs());
        Aabb::from_center_extent(self.center(), DVec3::splat(radius))
    }
}
