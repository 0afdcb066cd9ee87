//! BRDFのトレイトを定義するモジュール。

mod blinn_phong;
mod cook_torrance;

pub use blinn_phong::*;
pub use cook_torrance::*;

use glam::DVec3;
use rand::RngCore;

use crate::Material;

/// BRDFの評価の結果を表す構造体。
#[derive(Debug, Clone, Copy)]
pub struct BrdfEval {
    /// 拡散と鏡面の合計。
    pub color: DVec3,
    /// フレネル反射率。
    pub fresnel: DVec3,
    /// 拡散成分。
    pub diffuse: DVec3,
    /// 鏡面成分。
    pub specular: DVec3,
}

/// BRDFのトレイト。
/// 評価・重点サンプリング・サンプリングのPDFの3つの操作を持つ。
/// 引数のベクトルはすべて単位ベクトルで、viewとlightは表面から外へ向く。
pub trait Brdf: Send + Sync {
    /// BRDFを評価する。
    fn eval(&self, normal: DVec3, view: DVec3, light: DVec3, material: &Material) -> BrdfEval;

    /// マイクロ法線を重点サンプリングする。
    fn sample(
        &self,
        normal: DVec3,
        view: DVec3,
        material: &Material,
        rng: &mut dyn RngCore,
    ) -> DVec3;

    /// lightの方向をサンプリングする確率密度を返す。
    fn pdf(&self, normal: DVec3, view: DVec3, light: DVec3, material: &Material) -> f64;
}
