use std::io::Write;

use glam::DVec3;
use math::{Ray, Transform};

use scene::{Material, Scene, SceneError, TriangleMesh};

/// テスト用のOBJファイルを一時ディレクトリに書き出す。
fn write_obj(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    let mut file = std::fs::File::create(&path).expect("failed to create temp obj");
    file.write_all(contents.as_bytes()).unwrap();
    path
}

/// 1枚の四角形を2つの三角形で表したOBJ。法線は書かない。
const QUAD_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3
f 1 3 4
";

#[test]
fn load_obj_counts_vertices_and_faces() {
    let path = write_obj("mesh_test_quad.obj", QUAD_OBJ);
    let mesh = TriangleMesh::load_obj(&path).expect("load should succeed");
    std::fs::remove_file(&path).ok();

    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 2);
}

/// ファイルに法線が無ければ、接続面の面法線の合計を正規化した頂点法線が入る。
#[test]
fn load_obj_computes_smooth_normals() {
    let path = write_obj("mesh_test_normals.obj", QUAD_OBJ);
    let mesh = TriangleMesh::load_obj(&path).expect("load should succeed");
    std::fs::remove_file(&path).ok();

    for index in 0..mesh.vertex_count() {
        let normal = mesh.vertex(index).normal;
        assert!((normal.length() - 1.0).abs() < 1e-9);
        // 平らな四角形なのですべての頂点法線は面法線+Zに一致する。
        assert!(normal.abs_diff_eq(DVec3::Z, 1e-9));
    }
}

/// 存在しないファイルは構築エラーとして呼び出し側に返る。
#[test]
fn load_obj_missing_file_fails() {
    let result = TriangleMesh::load_obj("/nonexistent/missing.obj");
    assert!(matches!(result, Err(SceneError::MeshLoad { .. })));
}

/// メッシュは個別の三角形プリミティブに展開されてシーンに入る。
#[test]
fn add_mesh_explodes_into_triangles() {
    let mesh = TriangleMesh::from_raw(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    );

    let mut scene = Scene::new();
    let material = scene.add_material(Material::dielectric(DVec3::ONE, 0.5));
    let indices = scene.add_mesh(
        mesh,
        Transform::from_translation(DVec3::new(0.0, 0.0, -5.0)),
        material,
        false,
    );

    assert_eq!(indices.len(), 2);
    assert_eq!(scene.primitives().len(), 2);

    // 展開された三角形はメッシュの変換を共有している。
    let ray = Ray::new(DVec3::new(0.5, 0.5, 0.0), DVec3::new(0.0, 0.0, -1.0));
    let hit = scene.query_linear(&ray).expect("should hit the quad");
    assert!((hit.depth - 5.0).abs() < 1e-9);
    assert_eq!(hit.material, material);
}

/// 退化した面は展開時に警告されて取り除かれる。
#[test]
fn add_mesh_skips_degenerate_faces() {
    let mesh = TriangleMesh::from_raw(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
        ],
        // 2つ目の面は同一頂点を繰り返した退化三角形。
        vec![[0, 1, 2], [0, 0, 1]],
    );

    let mut scene = Scene::new();
    let material = scene.add_material(Material::dielectric(DVec3::ONE, 0.5));
    let indices = scene.add_mesh(mesh, Transform::IDENTITY, material, false);

    assert_eq!(indices.len(), 1);
}

/// 頂点を共有する面の頂点法線は面法線の平均方向になる。
#[test]
fn shared_vertex_normals_average_face_normals() {
    // 屋根型に折れた2枚の三角形。
    let mesh = TriangleMesh::from_raw(
        vec![
            DVec3::new(-1.0, 0.0, 1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 2.0),
        ],
        vec![[0, 1, 2], [1, 0, 3]],
    );

    // 両方の面に接続する頂点0の法線は2つの面法線の間を向く。
    let normal = mesh.vertex(0).normal;
    assert!((normal.length() - 1.0).abs() < 1e-9);
    let face_a = (mesh.vertex(1).position - mesh.vertex(0).position)
        .cross(mesh.vertex(2).position - mesh.vertex(0).position)
        .normalize();
    let face_b = (mesh.vertex(0).position - mesh.vertex(1).position)
        .cross(mesh.vertex(3).position - mesh.vertex(1).position)
        .normalize();
    assert!(normal.dot(face_a) > 0.0);
    assert!(normal.dot(face_b) > 0.0);
}
