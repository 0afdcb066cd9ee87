//! モンテカルロ積分用のサンプリング関数を定義するモジュール。

use std::f64::consts::PI;

use glam::{DVec2, DVec3};
use rand::{Rng, RngCore};

/// 球面座標(θ, φ)を単位ベクトルに変換する。
/// θは+Z軸からの偏角、φはXY平面内の方位角。
#[inline(always)]
pub fn spherical_to_unit_cartesian(spherical: DVec2) -> DVec3 {
    let (theta, phi) = (spherical.x, spherical.y);
    DVec3::new(
        theta.sin() * phi.cos(),
        theta.sin() * phi.sin(),
        theta.cos(),
    )
}

/// ローカル座標系のベクトルを、normalをZ軸とする座標系に変換する。
/// normalと平行にならない主軸を選んでタンジェントを安定に構築する。
pub fn to_normal_frame(v: DVec3, normal: DVec3) -> DVec3 {
    const INV_SQRT_3: f64 = 0.577_350_269_189_625_8;
    let major_axis = if normal.x.abs() < INV_SQRT_3 {
        DVec3::X
    } else if normal.y.abs() < INV_SQRT_3 {
        DVec3::Y
    } else {
        DVec3::Z
    };

    let u = normal.cross(major_axis).normalize();
    let v_axis = normal.cross(u);
    let w = normal;

    u * v.x + v_axis * v.y + w * v.z
}

/// 点から距離distanceにある半径radiusの球に接する円錐の半頂角を返す。
#[inline(always)]
pub fn cone_angle_for_sphere(radius: f64, distance: f64) -> f64 {
    (radius / distance).clamp(-1.0, 1.0).asin()
}

/// 半頂角half_angleの円錐内のランダムな単位ベクトルをサンプリングする。
pub fn sample_cone(dir: DVec3, half_angle: f64, rng: &mut dyn RngCore) -> DVec3 {
    let phi = rng.random_range(-PI..PI);
    let theta = rng.random_range(0.0..=half_angle);

    let local = spherical_to_unit_cartesian(DVec2::new(theta, phi));
    to_normal_frame(local, dir).normalize()
}

/// ベクトルを法線で鏡映する。
#[inline(always)]
pub fn reflect(v: DVec3, normal: DVec3) -> DVec3 {
    v - normal * (2.0 * v.dot(normal))
}

/// スネルの法則による屈折ベクトルを返す。
/// 全反射の場合はゼロベクトルを返す。
pub fn refract(incident: DVec3, normal: DVec3, index: f64) -> DVec3 {
    let mut cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (1.0, index);
    let mut n = normal;

    if cos_i < 0.0 {
        cos_i = -cos_i;
    } else {
        // 媒質の内側から出る場合は屈折率と法線を反転する。
        std::mem::swap(&mut eta_i, &mut eta_t);
        n = -n;
    }
    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        DVec3::ZERO
    } else {
        incident * eta + n * (eta * cos_i - k.sqrt())
    }
}
