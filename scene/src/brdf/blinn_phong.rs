//! Blinn-PhongのBRDFを実装するモジュール。
//! Lambertの拡散と(N·H)^n の鏡面ローブを持つ。

use std::f64::consts::PI;

use glam::{DVec2, DVec3};
use math::{spherical_to_unit_cartesian, to_normal_frame};
use rand::{Rng, RngCore};

use crate::{Brdf, BrdfEval, Material};

/// Blinn-PhongのBRDF。
pub struct BlinnPhong;

impl BlinnPhong {
    /// マテリアルから鏡面指数を取り出す。
    fn specular_exponent(material: &Material) -> f64 {
        material.scalar("SpecularExponent", 1.0).max(1.0)
    }
}

impl Brdf for BlinnPhong {
    fn eval(&self, normal: DVec3, view: DVec3, light: DVec3, material: &Material) -> BrdfEval {
        let color = material.vector("Color", DVec3::ZERO);
        let exponent = Self::specular_exponent(material);

        let lambertian = light.dot(normal).max(0.0);
        let specular = if lambertian > 0.0 {
            let half = (light + view).normalize();
            let specular_angle = half.dot(normal).max(0.0);
            DVec3::splat(specular_angle.powf(exponent))
        } else {
            DVec3::ZERO
        };
        let diffuse = color / PI;

        BrdfEval {
            color: diffuse + specular,
            fresnel: DVec3::ZERO,
            diffuse,
            specular,
        }
    }

    /// (N·H)^n の分布からマイクロ法線をサンプリングする。
    fn sample(
        &self,
        normal: DVec3,
        _view: DVec3,
        material: &Material,
        rng: &mut dyn RngCore,
    ) -> DVec3 {
        let exponent = Self::specular_exponent(material);

        let u: f64 = rng.random();
        let v: f64 = rng.random();
        let theta = u.powf(1.0 / (exponent + 1.0)).acos();
        let phi = v * 2.0 * PI;

        let local = spherical_to_unit_cartesian(DVec2::new(theta, phi));
        to_normal_frame(local, normal).normalize()
    }

    fn pdf(&self, normal: DVec3, view: DVec3, light: DVec3, material: &Material) -> f64 {
        let exponent = Self::specular_exponent(material);

        let half = (light + view).normalize();
        let n_dot_h = normal.dot(half).max(0.0);

        // マイクロ法線のPDFを反射方向のPDFに変換するヤコビアンが1/(4·V·H)。
        (exponent + 1.0) / (2.0 * PI) * n_dot_h.powf(exponent) / (4.0 * view.dot(half))
    }
}
