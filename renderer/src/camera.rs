//! ピンホールカメラを定義するモジュール。

use glam::{DVec2, DVec3};
use math::Ray;

/// 原点に固定され-Z方向を向くピンホールカメラ。
/// ピクセル(0, 0)は画像の左上。
pub struct Camera {
    fov: f64,
    width: u32,
    height: u32,
}
impl Camera {
    /// カメラを作成する。fovはラジアン。
    pub fn new(fov: f64, width: u32, height: u32) -> Self {
        Self { fov, width, height }
    }

    /// 画像の幅を取得する。
    pub fn width(&self) -> u32 {
        self.width
    }

    /// 画像の高さを取得する。
    pub fn height(&self) -> u32 {
        self.height
    }

    /// ピクセル内の連続座標(x, y)からレイを生成する。
    pub fn generate_ray(&self, x: f64, y: f64) -> Ray {
        let aspect_ratio = self.width as f64 / self.height as f64;
        let scale = (self.fov / 2.0).tan();

        let ssx = (2.0 * x / self.width as f64 - 1.0) * aspect_ratio;
        let ssy = 2.0 * y / self.height as f64 - 1.0;

        // 行番号は下へ増えるがカメラ空間のYは上向きなので符号を反転する。
        let dir = DVec3::new(ssx * scale, -ssy * scale, -1.0).normalize();

        Ray::new(DVec3::ZERO, dir)
    }

    /// ピクセル(x, y)の内部のジッターされた位置からレイをサンプリングする。
    /// jitterは[0, 1)^2 の範囲で、(0.5, 0.5)がピクセル中心。
    pub fn sample_ray(&self, x: u32, y: u32, jitter: DVec2) -> Ray {
        self.generate_ray(x as f64 + jitter.x, y as f64 + jitter.y)
    }
}
