//! 空間の変換を表す構造体を定義するモジュール。

use glam::{DQuat, DVec3};

use crate::{Aabb, Ray};

/// 平行移動・回転・スケールの変換を表す構造体。
/// プリミティブはレイをこの変換の逆でローカル座標系に移してから交差判定を行う。
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    translation: DVec3,
    rotation: DQuat,
    scale: DVec3,
}
impl Transform {
    /// 恒等変換。
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    /// 平行移動・回転・スケールからTransformを作成する。
    #[inline(always)]
    pub fn trs(translation: DVec3, rotation: DQuat, scale: DVec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// 平行移動のみのTransformを作成する。
    #[inline(always)]
    pub fn from_translation(translation: DVec3) -> Self {
        Self::trs(translation, DQuat::IDENTITY, DVec3::ONE)
    }

    /// 平行移動を取得する。
    #[inline(always)]
    pub fn translation(&self) -> DVec3 {
        self.translation
    }

    /// 回転を取得する。
    #[inline(always)]
    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    /// スケールを取得する。
    #[inline(always)]
    pub fn scale(&self) -> DVec3 {
        self.scale
    }

    /// 平行移動を設定する。
    #[inline(always)]
    pub fn set_translation(&mut self, translation: DVec3) {
        self.translation = translation;
    }

    /// 位置をローカル座標系からワールド座標系に変換する。
    #[inline(always)]
    pub fn transform_position(&self, position: DVec3) -> DVec3 {
        self.rotation * (position * self.scale) + self.translation
    }

    /// 方向ベクトルをローカル座標系からワールド座標系に変換する。
    /// スケールがかかるため長さは保存されない。
    #[inline(always)]
    pub fn transform_direction(&self, dir: DVec3) -> DVec3 {
        self.rotation * (dir * self.scale)
    }

    /// 位置をワールド座標系からローカル座標系に変換する。
    #[inline(always)]
    pub fn inverse_transform_position(&self, position: DVec3) -> DVec3 {
        (self.rotation.inverse() * (position - self.translation)) / self.scale
    }

    /// 方向ベクトルをワールド座標系からローカル座標系に変換する。
    #[inline(always)]
    pub fn inverse_transform_direction(&self, dir: DVec3) -> DVec3 {
        (self.rotation.inverse() * dir) / self.scale
    }

    /// レイをワールド座標系からローカル座標系に変換する。
    /// 方向は正規化し直す。
    #[inline(always)]
    pub fn inverse_transform_ray(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.inverse_transform_position(ray.origin),
            self.inverse_transform_direction(ray.dir).normalize(),
        )
    }

    /// Aabbをローカル座標系からワールド座標系に変換する。
    /// 8頂点を変換した軸平行の包含箱を返す。
    pub fn transform_bounds(&self, bounds: &Aabb) -> Aabb {
        let mut out = Aabb::EMPTY;
        for vertex in bounds.vertices() {
            out.grow(self.transform_position(vertex));
        }
        out
    }
}
impl Default for Transform {
    #[inline(always)]
    fn default() -> Self {
        Self::IDENTITY
    }
}
