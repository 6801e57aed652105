/// End-to-end checks of load -> transform -> visibility
use nalgebra::{Matrix4, Vector3};
use polyview_core::{
    visibility, Camera, LoadError, Mesh, ModelState, Pipeline, RenderConfig, Rotation, Viewport,
    VisibilityPolicy,
};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn still() -> ModelState {
    ModelState::new(Rotation::zero(), 0.0)
}

#[test]
fn test_reference_screen_coordinate() {
    let mesh = Mesh::from_obj("v 1 2 -3\nv 0 0 -1\nv 1 0 -1\nf 1 2 3\n").unwrap();
    let pipeline = Pipeline::new(RenderConfig {
        viewport: Viewport::new(640.0, 480.0),
        scale: 1.0,
        camera: Some(Camera::new(Vector3::zeros(), Vector3::new(0.0, 0.0, -1.0))),
        ..Default::default()
    });

    let polygons = pipeline.transform(&mesh, &still());
    let p = polygons[0].screen[0];
    assert!((p.x - -415.692_193_816_530_56).abs() < 1e-9, "x = {}", p.x);
    assert!((p.y - 831.384_387_633_061_1).abs() < 1e-9, "y = {}", p.y);
    assert!((p.depth - -2.000_585_994_726_047_4).abs() < 1e-9, "depth = {}", p.depth);
}

#[test]
fn test_identity_chain_without_camera() {
    let pipeline = Pipeline::new(RenderConfig {
        scale: 1.0,
        ..Default::default()
    });
    let state = still();
    assert_eq!(
        pipeline.model_view_projection(&state),
        pipeline.config().projection().matrix() * Matrix4::identity()
    );
}

#[test]
fn test_backface_cull_unit_cube() {
    let mesh = Mesh::cube(1.0);
    let camera = Camera::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, -1.0));
    let pipeline = Pipeline::new(RenderConfig {
        scale: 1.0,
        camera: Some(camera),
        visibility: VisibilityPolicy::BackfaceCull,
        ..Default::default()
    });
    assert_eq!(pipeline.view_direction(), Vector3::new(0.0, 0.0, 1.0));

    let kept: Vec<_> = pipeline.frame(&mesh, &still()).iter().map(|p| p.face).collect();
    // face 0 (-z) faces the camera; its outward normal opposes the view
    // direction, so it is the one face dropped
    assert_eq!(kept, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_backface_cull_preserves_order_and_points() {
    let mesh = Mesh::cube(1.0);
    let pipeline = Pipeline::new(RenderConfig {
        visibility: VisibilityPolicy::BackfaceCull,
        ..Default::default()
    });
    let state = ModelState::default();
    let all = pipeline.transform(&mesh, &state);
    let kept = pipeline.frame(&mesh, &state);
    assert!(kept.len() <= all.len());
    for polygon in &kept {
        assert_eq!(polygon, &all[polygon.face]);
    }
    assert!(kept.windows(2).all(|w| w[0].face < w[1].face));
}

#[test]
fn test_depth_sort_frame_is_ascending() {
    let mesh = Mesh::default_model().unwrap();
    let pipeline = Pipeline::new(RenderConfig::default());
    let frame = pipeline.frame(&mesh, &ModelState::default());
    assert_eq!(frame.len(), mesh.face_count());
    let keys: Vec<_> = frame.iter().map(visibility::depth_key).collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]), "{keys:?}");
}

#[test]
fn test_frame_leaves_mesh_untouched() {
    let mesh = Mesh::default_model().unwrap();
    let before = mesh.clone();
    let pipeline = Pipeline::new(RenderConfig {
        visibility: VisibilityPolicy::BackfaceCull,
        ..Default::default()
    });
    let mut state = ModelState::default();
    for _ in 0..10 {
        state.advance();
        pipeline.frame(&mesh, &state);
    }
    assert_eq!(mesh, before);
}

#[test]
fn test_bad_index_fails_load() {
    let result = Mesh::from_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 99\n");
    assert!(matches!(
        result,
        Err(LoadError::IndexOutOfRange { index: 99, vertex_count: 3, .. })
    ));
}

#[quickcheck]
fn counts_match_source_lines(vertex_count: u8, faces: Vec<(u8, u8, u8)>) -> TestResult {
    if vertex_count == 0 {
        return TestResult::discard();
    }
    let n = vertex_count as usize;

    let mut src = String::new();
    for i in 0..n {
        src.push_str(&format!("v {i} {} -{i}.5\n", i * 2));
    }
    src.push_str("# faces\n");
    for &(a, b, c) in &faces {
        let [a, b, c] = [a, b, c].map(|i| i as usize % n + 1);
        src.push_str(&format!("f {a}/1 {b} {c}//2\n"));
    }

    let mesh = match Mesh::from_obj(&src) {
        Ok(mesh) => mesh,
        Err(e) => return TestResult::error(e.to_string()),
    };
    TestResult::from_bool(
        mesh.vertex_count() == n
            && mesh.face_count() == faces.len()
            && mesh
                .faces()
                .iter()
                .all(|f| f.vertices(&mesh).count() == 3),
    )
}
