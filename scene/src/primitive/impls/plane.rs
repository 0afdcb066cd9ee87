//! 無限平面のプリミティブを定義するモジュール。

use glam::DVec3;
use math::{Aabb, Ray, Transform};

use crate::{Hit, MaterialIndex, Primitive};

/// 平面がBVHに入るときに使う有限のバウンディング半径。
const PLANE_BOUNDS_EXTENT: f64 = 1e6;

/// 無限平面のプリミティブ。
/// transformの平行移動成分を通る、normalを法線とする平面。
pub struct Plane {
    transform: Transform,
    normal: DVec3,
    material: MaterialIndex,
}
impl Plane {
    /// 平面を作成する。normalは正規化される。
    pub fn new(transform: Transform, normal: DVec3, material: MaterialIndex) -> Self {
        Self {
            transform,
            normal: normal.normalize(),
            material,
        }
    }
}
impl Primitive for Plane {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let denom = self.normal.dot(ray.dir);
        if denom.abs() < 1e-10 {
            return None;
        }

        let t = (self.transform.translation() - ray.origin).dot(self.normal) / denom;
        if t < 1e-5 {
            return None;
        }

        let position = ray.at(t);
        let depth = (position - ray.origin).length();

        Some(Hit::new(position, self.normal, depth, self.material))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_center_extent(
            self.transform.translation(),
            DVec3::splat(PLANE_BOUNDS_EXTENT),
        )
    }
}
