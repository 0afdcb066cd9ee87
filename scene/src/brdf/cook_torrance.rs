//! Cook-TorranceのマイクロファセットBRDFを実装するモジュール。
//! 分布にGGX、幾何項にSmith、フレネルにSchlickの近似を使う。

use std::f64::consts::PI;

use glam::{DVec2, DVec3};
use math::{spherical_to_unit_cartesian, to_normal_frame};
use rand::{Rng, RngCore};

use crate::{Brdf, BrdfEval, Material};

/// Cook-TorranceのBRDF。
pub struct CookTorrance;

impl CookTorrance {
    /// Smithの片側マスキング関数G1。
    fn g1(dot: f64, alpha2: f64) -> f64 {
        let n = 2.0 * dot;
        let d = dot + (alpha2 + (1.0 - alpha2) * dot * dot).sqrt();
        n / d
    }

    /// マスキング・シャドウイング関数G。
    fn g(n_dot_l: f64, n_dot_v: f64, alpha2: f64) -> f64 {
        Self::g1(n_dot_l, alpha2) * Self::g1(n_dot_v, alpha2)
    }

    /// GGXのマイクロファセット分布関数D。
    fn d(alpha2: f64, h_dot_n: f64) -> f64 {
        let denom = PI * (h_dot_n * h_dot_n * (alpha2 - 1.0) + 1.0).powi(2);
        alpha2 / denom
    }

    /// Schlickのフレネル近似F。
    fn f(h_dot_v: f64, f0: DVec3) -> DVec3 {
        f0 + (DVec3::ONE - f0) * (1.0 - h_dot_v).powi(5)
    }

    /// マテリアルからクランプ済みのroughnessを取り出す。
    fn roughness(material: &Material) -> f64 {
        material.scalar("Roughness", 0.5).clamp(0.001, 1.0)
    }
}

impl Brdf for CookTorrance {
    fn eval(&self, normal: DVec3, view: DVec3, light: DVec3, material: &Material) -> BrdfEval {
        let roughness = Self::roughness(material);
        let index = material.scalar("RefractionIndex", 1.0);
        let metallic = material.scalar("Metallic", 0.0);
        let color = material.vector("Color", DVec3::ZERO);

        let half = (light + view).normalize();
        let alpha2 = roughness.powi(4);
        let h_dot_n = half.dot(normal).max(0.0);
        let v_dot_n = view.dot(normal).max(0.0);
        let l_dot_n = light.dot(normal).max(0.0);
        let h_dot_v = view.dot(half).max(0.0);

        // 屈折率から垂直入射の反射率を求め、metallicでベースカラーに寄せる。
        let f0 = DVec3::splat(((1.0 - index) / (1.0 + index)).powi(2));
        let f0 = f0.lerp(color, metallic);
        let fresnel = Self::f(h_dot_v, f0);

        let specular = fresnel * Self::g(l_dot_n, v_dot_n, alpha2) * Self::d(alpha2, h_dot_n)
            / (4.0 * v_dot_n * l_dot_n).max(1e-6);
        let kd = (DVec3::ONE - fresnel) * (1.0 - metallic);
        let diffuse = color * kd / PI;

        BrdfEval {
            color: diffuse + specular,
            fresnel,
            diffuse,
            specular,
        }
    }

    /// GGXの分布からマイクロ法線を重点サンプリングする。
    fn sample(
        &self,
        normal: DVec3,
        _view: DVec3,
        material: &Material,
        rng: &mut dyn RngCore,
    ) -> DVec3 {
        let roughness = Self::roughness(material);
        let alpha2 = roughness.powi(4);

        let u: f64 = rng.random();
        let v: f64 = rng.random();
        let theta = ((1.0 - u) / ((alpha2 - 1.0) * u + 1.0)).sqrt().acos();
        let phi = v * 2.0 * PI;

        let local = spherical_to_unit_cartesian(DVec2::new(theta, phi));
        to_normal_frame(local, normal).normalize()
    }

    fn pdf(&self, normal: DVec3, view: DVec3, light: DVec3, material: &Material) -> f64 {
        let roughness = Self::roughness(material);
        let alpha = roughness * roughness;
        let alpha2 = alpha * alpha;

        let half = (light + view).normalize();
        let n_dot_h = normal.dot(half);

        Self::d(alpha2, n_dot_h) * n_dot_h / (4.0 * view.dot(half))
    }
}
