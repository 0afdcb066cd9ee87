//! 軸平行な直方体のプリミティブを定義するモジュール。

use glam::DVec3;
use math::{Aabb, Ray, Transform};

use crate::{Hit, MaterialIndex, Primitive};

/// 軸平行な直方体のプリミティブ。
/// transformの平行移動成分を中心とし、extentを半径ベクトルとする。
pub struct Cuboid {
    transform: Transform,
    extent: DVec3,
    material: MaterialIndex,
}
impl Cuboid {
    /// 中心と半径ベクトルから直方体を作成する。
    pub fn new(center: DVec3, extent: DVec3, material: MaterialIndex) -> Self {
        Self {
            transform: Transform::from_translation(center),
            extent,
            material,
        }
    }

    /// 最小・最大コーナーから直方体を作成する。
    pub fn from_min_max(min: DVec3, max: DVec3, material: MaterialIndex) -> Self {
        Self::new((min + max) * 0.5, (max - min) * 0.5, material)
    }
}
impl Primitive for Cuboid {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let center = self.transform.translation();
        let local_ray = Ray::new(ray.origin - center, ray.dir);

        let bounds = Aabb::from_center_extent(DVec3::ZERO, self.extent);
        let slab = bounds.intersect(&local_ray)?;

        // 原点が内側にある場合は遠い方の交差を使い、法線を反転する。
        let inside = slab.t_near < 0.0;
        let t = if inside { slab.t_far } else { slab.t_near };

        let position = ray.at(t);
        let local_hit = position - center;

        // 支配的な軸を切り出して法線を復元する。
        // バイアスで面上の成分がちょうど1になるようにする。
        let normal = DVec3::new(
            (local_hit.x / self.extent.x * (1.0 + 1e-8)).trunc(),
            (local_hit.y / self.extent.y * (1.0 + 1e-8)).trunc(),
            (local_hit.z / self.extent.z * (1.0 + 1e-8)).trunc(),
        )
        .normalize();
        let normal = if inside { -normal } else { normal };
        let depth = (position - ray.origin).length();

        Some(Hit::new(position, normal, depth, self.material))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_center_extent(self.transform.translation(), self.extent)
    }
}
