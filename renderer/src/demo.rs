//! CLIから選択できるデモシーンを定義するモジュール。
//! カメラは原点で-Z方向を向くため、ジオメトリはカメラ空間で配置する。

use anyhow::{Context, bail};
use glam::{DQuat, DVec3};
use math::Transform;
use scene::{Cuboid, Material, Plane, Scene, Sphere, SphereLight, TriangleMesh};

/// デモシーンの作成のための引数。
pub struct DemoArgs {
    /// シーン2で読み込むOBJファイルのパス。
    pub mesh: Option<String>,
    /// 環境マップのHDR/LDR画像のパス。
    pub environment: Option<String>,
}

/// 番号で指定されたデモシーンを作成する。
pub fn load_scene(number: u32, args: &DemoArgs) -> anyhow::Result<Scene> {
    let mut scene = match number {
        0 => load_scene_0(),
        1 => load_scene_1(),
        2 => load_scene_2(args)?,
        _ => bail!("unknown scene number: {number}"),
    };

    if let Some(path) = &args.environment {
        let texture = scene::Texture::load(path)
            .with_context(|| format!("failed to load environment map {path}"))?;
        scene.set_environment(texture);
    }

    Ok(scene)
}

/// 赤い球1つと球ライト1つの最小のシーン。
fn load_scene_0() -> Scene {
    let mut scene = Scene::new();

    let red = scene.add_material(Material::dielectric(DVec3::new(1.0, 0.0, 0.0), 1.0));
    scene.add(Box::new(Sphere::new(
        Transform::from_translation(DVec3::new(0.0, 0.0, -20.0)),
        5.0,
        red,
    )));

    let light_color = DVec3::splat(100.0);
    let light_material = scene.add_material(Material::light(light_color));
    scene.add(Box::new(SphereLight::new(
        DVec3::new(10.0, 10.0, -10.0),
        1.0,
        light_color,
        light_material,
    )));

    scene
}

/// 全種類のプリミティブとマテリアルのプリセットを使うシーン。
fn load_scene_1() -> Scene {
    let mut scene = Scene::new();

    // 床と奥の壁。
    let floor = scene.add_material(Material::dielectric(DVec3::splat(0.8), 0.9));
    scene.add(Box::new(Plane::new(
        Transform::from_translation(DVec3::new(0.0, -5.0, 0.0)),
        DVec3::Y,
        floor,
    )));
    let wall = scene.add_material(Material::dielectric(DVec3::new(0.4, 0.5, 0.8), 0.9));
    scene.add(Box::new(Plane::new(
        Transform::from_translation(DVec3::new(0.0, 0.0, -60.0)),
        DVec3::Z,
        wall,
    )));

    // 中央の金属球・鏡面球・ガラス球。
    let metal = scene.add_material(Material::metal(0.25));
    scene.add(Box::new(Sphere::new(
        Transform::from_translation(DVec3::new(-8.0, 0.0, -30.0)),
        5.0,
        metal,
    )));
    let mirror = scene.add_material(Material::mirror());
    scene.add(Box::new(Sphere::new(
        Transform::from_translation(DVec3::new(8.0, 0.0, -30.0)),
        5.0,
        mirror,
    )));
    let glass = scene.add_material(Material::glass());
    scene.add(Box::new(Sphere::new(
        Transform::from_translation(DVec3::new(0.0, -2.0, -18.0)),
        3.0,
        glass,
    )));

    // 赤い直方体。
    let red = scene.add_material(Material::dielectric(DVec3::new(1.0, 0.1, 0.1), 0.7));
    scene.add(Box::new(Cuboid::new(
        DVec3::new(0.0, -3.5, -35.0),
        DVec3::new(2.0, 1.5, 2.0),
        red,
    )));

    let light_color = DVec3::splat(60.0);
    let light_material = scene.add_material(Material::light(light_color));
    scene.add(Box::new(SphereLight::new(
        DVec3::new(0.0, 15.0, -25.0),
        2.0,
        light_color,
        light_material,
    )));

    scene
}

/// OBJメッシュを読み込むシーン。
fn load_scene_2(args: &DemoArgs) -> anyhow::Result<Scene> {
    let Some(path) = &args.mesh else {
        bail!("scene 2 requires --mesh <path to OBJ file>");
    };

    let mut scene = Scene::new();

    let floor = scene.add_material(Material::dielectric(DVec3::splat(0.7), 0.9));
    scene.add(Box::new(Plane::new(
        Transform::from_translation(DVec3::new(0.0, -3.0, 0.0)),
        DVec3::Y,
        floor,
    )));

    let mesh = TriangleMesh::load_obj(path)?;
    let material = scene.add_material(Material::dielectric(DVec3::splat(0.9), 0.5));
    let transform = Transform::trs(
        DVec3::new(0.0, -1.0, -12.0),
        DQuat::from_rotation_y(0.5),
        DVec3::splat(1.0),
    );
    scene.add_mesh(mesh, transform, material, true);

    let light_color = DVec3::splat(40.0);
    let light_material = scene.add_material(Material::light(light_color));
    scene.add(Box::new(SphereLight::new(
        DVec3::new(6.0, 8.0, -6.0),
        1.0,
        light_color,
        light_material,
    )));

    Ok(scene)
}
