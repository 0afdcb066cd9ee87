use std::f64::consts::PI;

use glam::DVec3;
use math::reflect;
use rand::{Rng, SeedableRng, rngs::StdRng};

use scene::{BlinnPhong, Brdf, CookTorrance, Material};

/// 一様に半球の方向をサンプリングする。PDFは1/(2π)。
fn sample_uniform_hemisphere(normal: DVec3, rng: &mut StdRng) -> DVec3 {
    loop {
        let v = DVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let len2 = v.length_squared();
        if len2 > 1e-9 && len2 <= 1.0 {
            let v = v / len2.sqrt();
            return if v.dot(normal) < 0.0 { -v } else { v };
        }
    }
}

/// 垂直入射(V·H=1)でフレネルがF0になる。
#[test]
fn fresnel_returns_f0_at_normal_incidence() {
    let brdf = CookTorrance;
    let mut material = Material::default();
    material.init_pbr(DVec3::ZERO, DVec3::ZERO, 0.5, 0.0, 1.5, 0.0);

    let normal = DVec3::Z;
    // V = L = N なら H = N で V·H = 1。
    let eval = brdf.eval(normal, normal, normal, &material);

    let f0 = ((1.0 - 1.5f64) / (1.0 + 1.5)).powi(2);
    assert!((eval.fresnel.x - f0).abs() < 1e-12);
    assert!((eval.fresnel.y - f0).abs() < 1e-12);
    assert!((eval.fresnel.z - f0).abs() < 1e-12);
}

/// グレージング角(V·H→0)でフレネルが1に近づく。
#[test]
fn fresnel_approaches_one_at_grazing() {
    let brdf = CookTorrance;
    let mut material = Material::default();
    material.init_pbr(DVec3::ZERO, DVec3::ZERO, 0.5, 0.0, 1.5, 0.0);

    let normal = DVec3::Z;
    // VとLを対称に倒すとHはNのままでV·H = cosθになる。
    let theta: f64 = 89.9f64.to_radians();
    let view = DVec3::new(theta.sin(), 0.0, theta.cos());
    let light = DVec3::new(-theta.sin(), 0.0, theta.cos());

    let eval = brdf.eval(normal, view, light, &material);
    assert!(eval.fresnel.x > 0.95, "fresnel={}", eval.fresnel.x);
}

/// 金属はF0がベースカラーになる。
#[test]
fn metallic_tints_f0_with_base_color() {
    let brdf = CookTorrance;
    let mut material = Material::default();
    let color = DVec3::new(1.0, 0.5, 0.1);
    material.init_pbr(color, DVec3::ZERO, 0.5, 1.0, 1.0, 0.0);

    let normal = DVec3::Z;
    let eval = brdf.eval(normal, normal, normal, &material);
    assert!(eval.fresnel.abs_diff_eq(color, 1e-9));

    // 金属は拡散成分を持たない。
    assert!(eval.diffuse.abs_diff_eq(DVec3::ZERO, 1e-12));
}

/// 白いラフな誘電体の拡散反射率は1を超えない。
#[test]
fn diffuse_energy_is_bounded() {
    let brdf = CookTorrance;
    let mut material = Material::default();
    material.init_pbr(DVec3::ONE, DVec3::ZERO, 1.0, 0.0, 1.0, 0.0);

    let normal = DVec3::Z;
    let view = DVec3::new(0.3, 0.0, 1.0).normalize();
    let mut rng = StdRng::seed_from_u64(5);

    // 一様サンプリングで∫ diffuse·cosθ dω を推定する。
    let samples = 100_000;
    let mut sum = DVec3::ZERO;
    for _ in 0..samples {
        let light = sample_uniform_hemisphere(normal, &mut rng);
        let eval = brdf.eval(normal, view, light, &material);
        sum += eval.diffuse * light.dot(normal).max(0.0) * 2.0 * PI;
    }
    let reflectance = sum / samples as f64;

    assert!(reflectance.x <= 1.05, "reflectance={}", reflectance.x);
    assert!(reflectance.x > 0.0);
}

/// GGXの重点サンプリングが逆関数法の分布に従う。
/// サンプルしたマイクロ法線からuを逆算すると一様分布に戻るはず。
#[test]
fn ggx_sampling_follows_inverse_cdf() {
    let brdf = CookTorrance;
    let normal = DVec3::Z;
    let view = DVec3::Z;

    for alpha in [0.1f64, 0.5, 1.0] {
        let mut material = Material::default();
        material.init_pbr(DVec3::ONE, DVec3::ZERO, alpha, 0.0, 1.0, 0.0);
        let alpha2 = alpha.powi(4);

        let mut rng = StdRng::seed_from_u64(17);
        let samples = 100_000;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..samples {
            let micronormal = brdf.sample(normal, view, &material, &mut rng);
            let cos2 = micronormal.dot(normal).clamp(0.0, 1.0).powi(2);
            // θ = acos(√((1-u)/((α²-1)u+1))) の逆変換。
            let u = (1.0 - cos2) / (cos2 * (alpha2 - 1.0) + 1.0);
            sum += u;
            sum_sq += u * u;
        }
        let mean = sum / samples as f64;
        let variance = sum_sq / samples as f64 - mean * mean;

        // Uniform(0,1)の平均1/2、分散1/12。
        assert!((mean - 0.5).abs() < 0.01, "alpha={alpha} mean={mean}");
        assert!(
            (variance - 1.0 / 12.0).abs() < 0.01,
            "alpha={alpha} variance={variance}"
        );
    }
}

/// sample→pdf→evalの整合性。
/// BRDF重点サンプリングによる反射率の推定が一様サンプリングの推定と一致する。
#[test]
fn importance_sampled_reflectance_matches_uniform_estimate() {
    let brdf = CookTorrance;
    let mut material = Material::default();
    material.init_pbr(DVec3::ONE, DVec3::ZERO, 0.5, 0.0, 1.5, 0.0);

    let normal = DVec3::Z;
    let view = DVec3::new(0.4, 0.0, 1.0).normalize();
    let samples = 300_000;

    // 一様サンプリングによる推定。
    let mut rng = StdRng::seed_from_u64(23);
    let mut uniform_sum = 0.0;
    for _ in 0..samples {
        let light = sample_uniform_hemisphere(normal, &mut rng);
        let eval = brdf.eval(normal, view, light, &material);
        uniform_sum += eval.color.x * light.dot(normal).max(0.0) * 2.0 * PI;
    }
    let uniform_estimate = uniform_sum / samples as f64;

    // マイクロ法線の重点サンプリングによる推定。
    let mut rng = StdRng::seed_from_u64(29);
    let mut importance_sum = 0.0;
    for _ in 0..samples {
        let micronormal = brdf.sample(normal, view, &material, &mut rng);
        let light = reflect(-view, micronormal);
        if light.dot(normal) <= 0.0 {
            continue;
        }
        let pdf = brdf.pdf(normal, view, light, &material);
        if !(pdf > 1e-9) {
            continue;
        }
        let eval = brdf.eval(normal, view, light, &material);
        importance_sum += eval.color.x * light.dot(normal) / pdf;
    }
    let importance_estimate = importance_sum / samples as f64;

    let relative = (importance_estimate - uniform_estimate).abs() / uniform_estimate;
    assert!(
        relative < 0.08,
        "uniform={uniform_estimate} importance={importance_estimate}"
    );
}

/// Blinn-Phongの評価とサンプリングの基本的な性質。
#[test]
fn blinn_phong_basics() {
    let brdf = BlinnPhong;
    let mut material = Material::default();
    material.init_blinn_phong(DVec3::new(0.8, 0.2, 0.2), 32.0);

    let normal = DVec3::Z;
    let view = DVec3::new(0.2, 0.0, 1.0).normalize();
    let light = DVec3::new(-0.2, 0.0, 1.0).normalize();

    let eval = brdf.eval(normal, view, light, &material);
    assert!(eval.diffuse.cmpge(DVec3::ZERO).all());
    assert!(eval.specular.cmpge(DVec3::ZERO).all());
    // 鏡面ローブはハーフベクトルが法線に一致する方向で強い。
    let off_light = DVec3::new(0.9, 0.0, 0.5).normalize();
    let off_eval = brdf.eval(normal, view, off_light, &material);
    assert!(eval.specular.x > off_eval.specular.x);

    let mut rng = StdRng::seed_from_u64(37);
    for _ in 0..100 {
        let micronormal = brdf.sample(normal, view, &material, &mut rng);
        assert!((micronormal.length() - 1.0).abs() < 1e-9);
        assert!(micronormal.dot(normal) >= 0.0);
        assert!(brdf.pdf(normal, view, reflect(-view, micronormal), &material) >= 0.0);
    }
}
