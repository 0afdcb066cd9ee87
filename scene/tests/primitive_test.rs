use std::f64::consts::PI;
use std::sync::Arc;

use glam::{DQuat, DVec2, DVec3};
use math::{Ray, Transform};
use rand::{SeedableRng, rngs::StdRng};

use scene::{
    Cuboid, Hit, Light, MaterialIndex, MeshData, Plane, Primitive, Sphere, SphereLight, Triangle,
    Vertex,
};

const MATERIAL: MaterialIndex = MaterialIndex(0);

/// 交差の共通の契約を確認する。
/// 深度はレイの原点から交差位置までのワールド距離に等しく、法線は単位長。
fn assert_hit_contract(ray: &Ray, hit: &Hit) {
    assert!(
        ((hit.position - ray.origin).length() - hit.depth).abs() < 1e-6,
        "depth must equal world-space distance"
    );
    assert!((hit.normal.length() - 1.0).abs() < 1e-6, "normal must be unit");
}

#[test]
fn sphere_hit_from_outside() {
    let sphere = Sphere::new(Transform::IDENTITY, 2.0, MATERIAL);
    let ray = Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::new(0.0, 0.0, -1.0));

    let hit = sphere.intersect(&ray).expect("should hit");
    assert_hit_contract(&ray, &hit);
    assert!((hit.depth - 8.0).abs() < 1e-9);
    assert!(hit.normal.abs_diff_eq(DVec3::Z, 1e-9));
}

#[test]
fn sphere_hit_from_inside_flips_normal() {
    let sphere = Sphere::new(Transform::IDENTITY, 2.0, MATERIAL);
    let ray = Ray::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0));

    let hit = sphere.intersect(&ray).expect("should hit");
    assert_hit_contract(&ray, &hit);
    assert!((hit.depth - 2.0).abs() < 1e-9);
    // 内側からのヒットは法線が内向きに反転する。
    assert!(hit.normal.abs_diff_eq(-DVec3::X, 1e-9));
}

#[test]
fn sphere_behind_ray_misses() {
    let sphere = Sphere::new(
        Transform::from_translation(DVec3::new(0.0, 0.0, 10.0)),
        1.0,
        MATERIAL,
    );
    let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
    assert!(sphere.intersect(&ray).is_none());
}

#[test]
fn transformed_sphere_keeps_world_depth() {
    // 平行移動と一様スケールのかかった球。
    let transform = Transform::trs(
        DVec3::new(0.0, 0.0, -10.0),
        DQuat::from_rotation_z(0.3),
        DVec3::splat(2.0),
    );
    let sphere = Sphere::new(transform, 1.0, MATERIAL);
    let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));

    let hit = sphere.intersect(&ray).expect("should hit");
    assert_hit_contract(&ray, &hit);
    // スケール2で実効半径2になり、z=-8で交差する。
    assert!((hit.depth - 8.0).abs() < 1e-9);
}

#[test]
fn sphere_bounding_box_scales() {
    let transform = Transform::trs(DVec3::ZERO, DQuat::IDENTITY, DVec3::splat(3.0));
    let sphere = Sphere::new(transform, 1.0, MATERIAL);
    let bounds = sphere.bounding_box();
    assert!(bounds.min.abs_diff_eq(DVec3::splat(-3.0), 1e-12));
    assert!(bounds.max.abs_diff_eq(DVec3::splat(3.0), 1e-12));
}

#[test]
fn plane_hit_and_miss() {
    let plane = Plane::new(
        Transform::from_translation(DVec3::new(0.0, -1.0, 0.0)),
        DVec3::Y,
        MATERIAL,
    );

    let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, -1.0, 0.0));
    let hit = plane.intersect(&ray).expect("should hit");
    assert_hit_contract(&ray, &hit);
    assert!((hit.depth - 1.0).abs() < 1e-9);
    assert!(hit.normal.abs_diff_eq(DVec3::Y, 1e-12));

    // 平面に平行なレイはヒットしない。
    let parallel = Ray::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0));
    assert!(plane.intersect(&parallel).is_none());

    // 平面が後ろにあるレイはヒットしない。
    let away = Ray::new(DVec3::ZERO, DVec3::new(0.0, 1.0, 0.0));
    assert!(plane.intersect(&away).is_none());
}

#[test]
fn cuboid_hit_recovers_face_normal() {
    let cuboid = Cuboid::new(DVec3::new(0.0, 0.0, -5.0), DVec3::new(1.0, 2.0, 1.0), MATERIAL);
    let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));

    let hit = cuboid.intersect(&ray).expect("should hit");
    assert_hit_contract(&ray, &hit);
    assert!((hit.depth - 4.0).abs() < 1e-9);
    assert!(hit.normal.abs_diff_eq(DVec3::Z, 1e-9));
}

#[test]
fn cuboid_hit_from_inside_flips_normal() {
    let cuboid = Cuboid::new(DVec3::ZERO, DVec3::splat(1.0), MATERIAL);
    let ray = Ray::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0));

    let hit = cuboid.intersect(&ray).expect("should hit");
    assert_hit_contract(&ray, &hit);
    assert!((hit.depth - 1.0).abs() < 1e-9);
    assert!(hit.normal.abs_diff_eq(-DVec3::X, 1e-9));
}

#[test]
fn cuboid_miss() {
    let cuboid = Cuboid::new(DVec3::new(0.0, 5.0, -5.0), DVec3::splat(1.0), MATERIAL);
    let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
    assert!(cuboid.intersect(&ray).is_none());
}

fn triangle_mesh_data(transform: Transform) -> Arc<MeshData> {
    // XY平面上の直角三角形。頂点法線は+Zと少し傾けたもの。
    Arc::new(MeshData {
        vertices: vec![
            Vertex {
                position: DVec3::new(0.0, 0.0, 0.0),
                normal: DVec3::Z,
                uv: DVec2::new(0.0, 0.0),
            },
            Vertex {
                position: DVec3::new(2.0, 0.0, 0.0),
                normal: DVec3::new(0.3, 0.0, 1.0).normalize(),
                uv: DVec2::new(1.0, 0.0),
            },
            Vertex {
                position: DVec3::new(0.0, 2.0, 0.0),
                normal: DVec3::new(0.0, 0.3, 1.0).normalize(),
                uv: DVec2::new(0.0, 1.0),
            },
        ],
        transform,
        material: MATERIAL,
    })
}

#[test]
fn triangle_flat_hit() {
    let mesh = triangle_mesh_data(Transform::IDENTITY);
    let triangle = Triangle::new(mesh, [0, 1, 2], false);
    let ray = Ray::new(DVec3::new(0.5, 0.5, 3.0), DVec3::new(0.0, 0.0, -1.0));

    let hit = triangle.intersect(&ray).expect("should hit");
    assert_hit_contract(&ray, &hit);
    assert!((hit.depth - 3.0).abs() < 1e-9);
    // フラットシェーディングは面法線を返す。
    assert!(hit.normal.abs_diff_eq(DVec3::Z, 1e-9));
}

#[test]
fn triangle_smooth_hit_interpolates_vertex_normals() {
    let mesh = triangle_mesh_data(Transform::IDENTITY);
    let triangle = Triangle::new(mesh, [0, 1, 2], true);
    let ray = Ray::new(DVec3::new(1.0, 0.5, 3.0), DVec3::new(0.0, 0.0, -1.0));

    let hit = triangle.intersect(&ray).expect("should hit");
    assert_hit_contract(&ray, &hit);
    // 補間された法線は面法線から傾く。
    assert!(hit.normal.dot(DVec3::Z) > 0.9);
    assert!(!hit.normal.abs_diff_eq(DVec3::Z, 1e-6));
}

#[test]
fn triangle_miss_outside_barycentric_range() {
    let mesh = triangle_mesh_data(Transform::IDENTITY);
    let triangle = Triangle::new(mesh, [0, 1, 2], false);

    // 三角形の外側(斜辺の向こう)を通るレイ。
    let ray = Ray::new(DVec3::new(1.5, 1.5, 3.0), DVec3::new(0.0, 0.0, -1.0));
    assert!(triangle.intersect(&ray).is_none());

    // 三角形の平面に平行なレイ。
    let parallel = Ray::new(DVec3::new(0.5, 0.5, 3.0), DVec3::new(1.0, 0.0, 0.0));
    assert!(triangle.intersect(&parallel).is_none());
}

#[test]
fn triangle_transformed_hit() {
    let transform = Transform::trs(
        DVec3::new(0.0, 0.0, -5.0),
        DQuat::IDENTITY,
        DVec3::splat(2.0),
    );
    let mesh = triangle_mesh_data(transform);
    let triangle = Triangle::new(mesh, [0, 1, 2], false);
    let ray = Ray::new(DVec3::new(1.0, 1.0, 0.0), DVec3::new(0.0, 0.0, -1.0));

    let hit = triangle.intersect(&ray).expect("should hit");
    assert_hit_contract(&ray, &hit);
    assert!((hit.depth - 5.0).abs() < 1e-9);
}

#[test]
fn triangle_bounding_box_is_world_space() {
    let transform = Transform::from_translation(DVec3::new(1.0, 0.0, 0.0));
    let mesh = triangle_mesh_data(transform);
    let triangle = Triangle::new(mesh, [0, 1, 2], false);

    let bounds = triangle.bounding_box();
    assert!(bounds.min.abs_diff_eq(DVec3::new(1.0, 0.0, 0.0), 1e-12));
    assert!(bounds.max.abs_diff_eq(DVec3::new(3.0, 2.0, 0.0), 1e-12));
}

#[test]
fn sphere_light_samples_inside_cone() {
    let light = SphereLight::new(DVec3::new(0.0, 10.0, 0.0), 2.0, DVec3::ONE, MATERIAL);
    let mut rng = StdRng::seed_from_u64(3);

    let point = DVec3::ZERO;
    let cone_angle = (2.0f64 / 10.0).asin();
    for _ in 0..1000 {
        let dir = light.sample_direction(point, &mut rng);
        assert!((dir.length() - 1.0).abs() < 1e-9);
        let angle = dir.dot(DVec3::Y).clamp(-1.0, 1.0).acos();
        assert!(angle <= cone_angle + 1e-9);
    }
}

#[test]
fn sphere_light_area_is_projected_disk() {
    let light = SphereLight::new(DVec3::ZERO, 3.0, DVec3::ONE, MATERIAL);
    assert!((light.area() - 9.0 * PI).abs() < 1e-12);
}

#[test]
fn sphere_light_is_a_light_primitive() {
    let light = SphereLight::new(DVec3::ZERO, 1.0, DVec3::splat(5.0), MATERIAL);
    let as_light = light.as_light().expect("sphere light must expose Light");
    assert_eq!(as_light.color(), DVec3::splat(5.0));

    let sphere = Sphere::new(Transform::IDENTITY, 1.0, MATERIAL);
    assert!(sphere.as_light().is_none());
}
