//! 球状のライトプリミティブを定義するモジュール。

use std::f64::consts::PI;

use glam::DVec3;
use math::{Aabb, Ray, Transform, cone_angle_for_sphere, sample_cone};
use rand::RngCore;

use crate::{Hit, Light, MaterialIndex, Primitive, Sphere};

/// 球状のライトのプリミティブ。
/// 交差判定は球と同じで、直接光サンプリング用の操作を追加で持つ。
pub struct SphereLight {
    sphere: Sphere,
    color: DVec3,
}
impl SphereLight {
    /// 球ライトを作成する。
    /// materialにはライトマテリアルを渡すことを想定している。
    pub fn new(center: DVec3, radius: f64, color: DVec3, material: MaterialIndex) -> Self {
        Self {
            sphere: Sphere::new(Transform::from_translation(center), radius, material),
            color,
        }
    }
}
impl Primitive for SphereLight {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        self.sphere.intersect(ray)
    }

    fn bounding_box(&self) -> Aabb {
        self.sphere.bounding_box()
    }

    fn as_light(&self) -> Option<&dyn Light> {
        Some(self)
    }
}
impl Light for SphereLight {
    /// 点から見てこの球に接する円錐の内側の方向を一様にサンプリングする。
    fn sample_direction(&self, point: DVec3, rng: &mut dyn RngCore) -> DVec3 {
        let to_center = self.sphere.center() - point;
        let cone_angle = cone_angle_for_sphere(self.sphere.radius(), to_center.length());
        sample_cone(to_center.normalize(), cone_angle, rng)
    }

    fn area(&self) -> f64 {
        PI * self.sphere.radius() * self.sphere.radius()
    }

    fn color(&self) -> DVec3 {
        self.color
    }

    fn center(&self) -> DVec3 {
        self.sphere.center()
    }
}
