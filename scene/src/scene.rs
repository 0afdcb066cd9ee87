//! シーンを表す構造体を定義するモジュール。
//!
//! シーンはプリミティブ・ライト・マテリアル・環境マップ・BVHを所有する。
//! プリミティブを追加した後にBVHを構築し、
//! 以降はレイを飛ばして最も近い交差を問い合わせる。
//! レンダリング開始後のプリミティブの追加・削除は&selfの共有参照で禁止される。

use glam::{DVec2, DVec3};
use math::{Ray, Transform};

use std::f64::consts::PI;

use crate::{
    Bvh, Hit, Light, Material, MaterialIndex, MaterialRepository, Primitive, PrimitiveIndex,
    Texture, Triangle, TriangleMesh,
};

/// シーンのデータを表す構造体。
#[derive(Default)]
pub struct Scene {
    primitives: Vec<Box<dyn Primitive>>,
    lights: Vec<PrimitiveIndex>,
    materials: MaterialRepository,
    environment: Option<Texture<DVec3>>,
    bvh: Option<Bvh>,
}
impl Scene {
    /// 空のシーンを作成する。
    pub fn new() -> Self {
        Self {
            primitives: Vec::new(),
            lights: Vec::new(),
            materials: MaterialRepository::new(),
            environment: None,
            bvh: None,
        }
    }

    /// マテリアルを登録しインデックスを返す。
    pub fn add_material(&mut self, material: Material) -> MaterialIndex {
        self.materials.add(material)
    }

    /// マテリアルの参照を取得する。
    #[inline(always)]
    pub fn material(&self, index: MaterialIndex) -> &Material {
        self.materials.get(index)
    }

    /// プリミティブをシーンに追加する。
    /// ライトのプリミティブはライトのリストにも登録される。
    pub fn add(&mut self, primitive: Box<dyn Primitive>) -> PrimitiveIndex {
        let index = PrimitiveIndex(self.primitives.len());
        if primitive.as_light().is_some() {
            self.lights.push(index);
        }
        self.primitives.push(primitive);
        index
    }

    /// メッシュを個別の三角形プリミティブに展開してシーンに追加する。
    /// 各三角形はメッシュの変換とマテリアルを共有する。
    pub fn add_mesh(
        &mut self,
        mesh: TriangleMesh,
        transform: Transform,
        material: MaterialIndex,
        smooth: bool,
    ) -> Vec<PrimitiveIndex> {
        let (data, faces) = mesh.into_shared(transform, material);
        faces
            .into_iter()
            .map(|face| self.add(Box::new(Triangle::new(data.clone(), face, smooth))))
            .collect()
    }

    /// 環境マップのテクスチャを設定する。
    pub fn set_environment(&mut self, texture: Texture<DVec3>) {
        self.environment = Some(texture);
    }

    /// 環境マップのテクスチャを取得する。
    pub fn environment(&self) -> Option<&Texture<DVec3>> {
        self.environment.as_ref()
    }

    /// シーンのプリミティブのリストを取得する。
    pub fn primitives(&self) -> &[Box<dyn Primitive>] {
        &self.primitives
    }

    /// プリミティブの参照を取得する。
    #[inline(always)]
    pub fn primitive(&self, index: PrimitiveIndex) -> &dyn Primitive {
        self.primitives[index.0].as_ref()
    }

    /// ライトのプリミティブのインデックスのリストを取得する。
    pub fn lights(&self) -> &[PrimitiveIndex] {
        &self.lights
    }

    /// ライトの参照を取得する。
    #[inline(always)]
    pub fn light(&self, index: PrimitiveIndex) -> &dyn Light {
        match self.primitives[index.0].as_light() {
            Some(light) => light,
            None => unreachable!(),
        }
    }

    /// シーンの全プリミティブからBVHを構築する。
    pub fn build_bvh(&mut self) {
        let items = self
            .primitives
            .iter()
            .enumerate()
            .map(|(index, primitive)| (primitive.bounding_box(), PrimitiveIndex(index)))
            .collect();
        self.bvh = Some(Bvh::build(items));
    }

    /// BVHを取得する。構築前はNone。
    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }

    /// BVHを破棄する。レンダリングの終了時に呼ばれる。
    pub fn clear_bvh(&mut self) {
        self.bvh = None;
    }

    /// シーンにレイを飛ばし最も近い交差を返す。
    /// BVHが構築済みならトラバースし、なければ線形走査にフォールバックする。
    pub fn query(&self, ray: &Ray) -> Option<Hit> {
        match &self.bvh {
            Some(bvh) => bvh.intersect(&self.primitives, ray),
            None => self.query_linear(ray),
        }
    }

    /// 全プリミティブを線形に走査して最も近い交差を返す。
    /// BVHの等価性テストの基準としても使う。
    pub fn query_linear(&self, ray: &Ray) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        for (index, primitive) in self.primitives.iter().enumerate() {
            if let Some(mut hit) = primitive.intersect(ray) {
                if closest.as_ref().is_none_or(|c| hit.depth < c.depth) {
                    hit.primitive = PrimitiveIndex(index);
                    closest = Some(hit);
                }
            }
        }
        closest
    }

    /// レイの方向で環境マップをサンプリングする。
    /// 方向をequirectangularのUVに射影してバイリニア補間する。
    /// 環境マップが無ければbackgroundを返す。
    pub fn sample_environment(&self, dir: DVec3, background: DVec3) -> DVec3 {
        let Some(environment) = &self.environment else {
            return background;
        };

        let u = (dir.y.atan2(dir.x) / PI + 1.0) * 0.5;
        let v = (dir.z + 1.0) * 0.5;
        environment.sample_uv(DVec2::new(u, 1.0 - v), true)
    }
}
