//! マテリアルを表す構造体とそのリポジトリを定義するモジュール。

use std::collections::HashMap;

use glam::DVec3;

/// マテリアルの種別タグ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialKind {
    #[default]
    None,
    BlinnPhong,
    Pbr,
    Light,
}

/// マテリアルの構造体。
/// 種別タグと、名前をキーとするスカラー・ベクトルのプロパティバッグを持つ。
/// 存在しないキーの参照は呼び出し側の指定するデフォルト値になる。
#[derive(Debug, Clone, Default)]
pub struct Material {
    kind: MaterialKind,
    scalars: HashMap<String, f64>,
    vectors: HashMap<String, DVec3>,
}
impl Material {
    /// 種別タグのみを持つ空のマテリアルを作成する。
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            scalars: HashMap::new(),
            vectors: HashMap::new(),
        }
    }

    /// 種別タグを取得する。
    #[inline(always)]
    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    /// スカラープロパティを追加する。
    pub fn add_scalar(&mut self, key: &str, value: f64) {
        self.scalars.insert(key.to_string(), value);
    }

    /// ベクトルプロパティを追加する。
    pub fn add_vector(&mut self, key: &str, value: DVec3) {
        self.vectors.insert(key.to_string(), value);
    }

    /// スカラープロパティを取得する。キーが無ければdefaultを返す。
    #[inline(always)]
    pub fn scalar(&self, key: &str, default: f64) -> f64 {
        self.scalars.get(key).copied().unwrap_or(default)
    }

    /// ベクトルプロパティを取得する。キーが無ければdefaultを返す。
    #[inline(always)]
    pub fn vector(&self, key: &str, default: DVec3) -> DVec3 {
        self.vectors.get(key).copied().unwrap_or(default)
    }

    /// Blinn-Phongマテリアルとして初期化する。
    pub fn init_blinn_phong(&mut self, color: DVec3, specular_exponent: f64) {
        self.kind = MaterialKind::BlinnPhong;
        self.scalars.clear();
        self.vectors.clear();

        self.add_vector("Color", color);
        self.add_scalar("SpecularExponent", specular_exponent);
    }

    /// PBRマテリアルとして初期化する。
    pub fn init_pbr(
        &mut self,
        color: DVec3,
        emissive: DVec3,
        roughness: f64,
        metallic: f64,
        refraction_index: f64,
        transmission: f64,
    ) {
        self.kind = MaterialKind::Pbr;
        self.scalars.clear();
        self.vectors.clear();

        self.add_vector("Color", color);
        self.add_vector("Emissive", emissive);
        self.add_scalar("Roughness", roughness);
        self.add_scalar("Metallic", metallic);
        self.add_scalar("RefractionIndex", refraction_index);
        self.add_scalar("Transmission", transmission);
    }

    /// ライトマテリアルとして初期化する。
    pub fn init_light(&mut self, emissive: DVec3) {
        self.kind = MaterialKind::Light;
        self.scalars.clear();
        self.vectors.clear();

        self.add_vector("Emissive", emissive);
    }

    /// 金属マテリアルを作成する。
    pub fn metal(roughness: f64) -> Self {
        let mut material = Self::default();
        material.init_pbr(DVec3::ONE, DVec3::ZERO, roughness, 1.0, 1.0, 0.0);
        material
    }

    /// ガラスマテリアルを作成する。
    pub fn glass() -> Self {
        let mut material = Self::default();
        material.init_pbr(DVec3::ZERO, DVec3::ZERO, 0.0, 0.0, 1.4, 1.0);
        material
    }

    /// 鏡面マテリアルを作成する。
    pub fn mirror() -> Self {
        let mut material = Self::default();
        material.init_pbr(DVec3::ONE, DVec3::ZERO, 0.0, 1.0, 1.0, 0.0);
        material
    }

    /// 誘電体マテリアルを作成する。
    pub fn dielectric(color: DVec3, roughness: f64) -> Self {
        let mut material = Self::default();
        material.init_pbr(color, DVec3::ZERO, roughness, 0.0, 1.0, 0.0);
        material
    }

    /// ライトマテリアルを作成する。
    pub fn light(emissive: DVec3) -> Self {
        let mut material = Self::default();
        material.init_light(emissive);
        material
    }
}

/// シーンに含まれるマテリアルのインデックス。
/// MaterialRepositoryからマテリアルを取得するために使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialIndex(pub usize);

/// シーンに含まれるマテリアルを一括して所有する構造体。
/// プリミティブはマテリアル本体ではなくインデックスを持つ。
#[derive(Debug, Default)]
pub struct MaterialRepository {
    materials: Vec<Material>,
}
impl MaterialRepository {
    /// 新しいMaterialRepositoryを作成する。
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
        }
    }

    /// マテリアルを登録しインデックスを返す。
    pub fn add(&mut self, material: Material) -> MaterialIndex {
        let index = MaterialIndex(self.materials.len());
        self.materials.push(material);
        index
    }

    /// マテリアルの参照を取得する。
    #[inline(always)]
    pub fn get(&self, index: MaterialIndex) -> &Material {
        &self.materials[index.0]
    }

    /// 登録済みのマテリアル数を返す。
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// マテリアルが登録されていないかを返す。
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
