//! 空間上のレイを表す構造体を定義するモジュール。

use glam::DVec3;

/// Ray構造体。
/// dirは交差判定の入り口では正規化されていることを前提とする。
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: DVec3,
    pub dir: DVec3,
}
impl Ray {
    /// Rayを作成する。
    #[inline(always)]
    pub fn new(origin: DVec3, dir: DVec3) -> Self {
        Self { origin, dir }
    }

    /// レイ上の距離tの位置を返す。
    #[inline(always)]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.dir * t
    }

    /// Rayの原点を少しだけdirの方向に移動させたRayを返す。
    #[inline(always)]
    pub fn move_forward(&self, distance: f64) -> Self {
        Self::new(self.origin + self.dir * distance, self.dir)
    }
}
