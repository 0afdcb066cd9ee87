//! プリミティブとライトのトレイトを定義するモジュール。

use glam::DVec3;
use math::{Aabb, Ray};
use rand::RngCore;

use crate::MaterialIndex;

/// シーンに含まれるプリミティブのインデックス。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveIndex(pub usize);
impl PrimitiveIndex {
    /// シーンに登録される前のプリミティブが返す未確定のインデックス。
    /// Scene::queryとBVHのトラバースが実際の値で上書きする。
    pub const UNSET: Self = Self(usize::MAX);
}

/// レイとプリミティブの交差の情報を表す構造体。
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    /// ワールド座標系での交差位置。
    pub position: DVec3,
    /// ワールド座標系での単位法線。
    /// 表面の外側を向き、レイの原点が内側にある場合は反転される。
    pub normal: DVec3,
    /// レイの原点から交差位置までのワールド座標系での距離。
    pub depth: f64,
    /// 交差したプリミティブのマテリアル。
    pub material: MaterialIndex,
    /// 交差したプリミティブ。
    pub primitive: PrimitiveIndex,
}
impl Hit {
    /// Hitを作成する。primitiveは呼び出し側が確定させる。
    #[inline(always)]
    pub fn new(position: DVec3, normal: DVec3, depth: f64, material: MaterialIndex) -> Self {
        Self {
            position,
            normal,
            depth,
            material,
            primitive: PrimitiveIndex::UNSET,
        }
    }
}

/// プリミティブのトレイト。
/// プリミティブはレイとの交差判定とバウンディングボックスの取得に答える。
pub trait Primitive: Send + Sync {
    /// レイとの交差判定を行う。
    /// 渡されるレイの方向は正規化されていることを前提とする。
    fn intersect(&self, ray: &Ray) -> Option<Hit>;

    /// ワールド座標系でのバウンディングボックスを取得する。
    fn bounding_box(&self) -> Aabb;

    /// ライトであればライトとしての参照を返す。
    fn as_light(&self) -> Option<&dyn Light> {
        None
    }
}

/// 発光するプリミティブのトレイト。
/// 直接光サンプリングの高速パスで使われる。
pub trait Light: Primitive {
    /// 点pointからライトに向かう方向をサンプリングする。
    fn sample_direction(&self, point: DVec3, rng: &mut dyn RngCore) -> DVec3;

    /// 直接光サンプリングの重みに使う投影面積を返す。
    fn area(&self) -> f64;

    /// ライトの色を返す。
    fn color(&self) -> DVec3;

    /// ライトの中心位置を返す。
    fn center(&self) -> DVec3;
}
