//! 空間上の軸平行バウンディングボックスを定義するモジュール。

use glam::DVec3;

use crate::Ray;

/// AabbとRayが交差した区間を表す構造体。
#[derive(Debug, Clone, Copy)]
pub struct AabbIntersection {
    pub t_near: f64,
    pub t_far: f64,
}

/// Aabb構造体。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}
impl Aabb {
    /// 何も含まない空のAabb。
    /// merge/growの単位元として使う。
    pub const EMPTY: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    /// Aabbを作成する。
    #[inline(always)]
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// 中心と半径ベクトルからAabbを作成する。
    #[inline(always)]
    pub fn from_center_extent(center: DVec3, extent: DVec3) -> Self {
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Aabbの中心を取得する。
    #[inline(always)]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Aabbの半径ベクトルを取得する。
    #[inline(always)]
    pub fn extent(&self) -> DVec3 {
        ((self.max - self.min) * 0.5).abs()
    }

    /// Aabbの表面積を取得する。
    #[inline(always)]
    pub fn area(&self) -> f64 {
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// 2つのAabbをマージする。
    #[inline(always)]
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// 点を含むようにAabbを拡張する。
    #[inline(always)]
    pub fn grow(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// 8頂点を取得する。
    #[inline(always)]
    pub fn vertices(&self) -> [DVec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            DVec3::new(min.x, min.y, min.z),
            DVec3::new(max.x, min.y, min.z),
            DVec3::new(min.x, max.y, min.z),
            DVec3::new(max.x, max.y, min.z),
            DVec3::new(min.x, min.y, max.z),
            DVec3::new(max.x, min.y, max.z),
            DVec3::new(min.x, max.y, max.z),
            DVec3::new(max.x, max.y, max.z),
        ]
    }

    /// スラブ法で交差区間を求める。
    /// dirの成分が0のときは符号付き無限大の除算で暗黙に処理される。
    pub fn intersect(&self, ray: &Ray) -> Option<AabbIntersection> {
        let t1 = (self.min - ray.origin) / ray.dir;
        let t2 = (self.max - ray.origin) / ray.dir;

        let t_near = t1.min(t2).max_element();
        let t_far = t1.max(t2).min_element();

        if t_near <= t_far && t_far >= 0.0 {
            Some(AabbIntersection { t_near, t_far })
        } else {
            None
        }
    }

    /// 交差の有無のみを判定する。
    #[inline(always)]
    pub fn intersects(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }
}
