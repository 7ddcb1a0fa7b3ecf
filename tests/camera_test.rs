use approx::assert_relative_eq;
use cell_ngin::{
    CameraConfig,
    camera::{Camera, Projection},
};

use crate::common::test_utils::{HEIGHT, WIDTH, app_context, runtime};

mod common;

#[test]
fn resize_sets_the_exact_aspect() {
    let rt = runtime();
    let mut app = app_context(&rt);
    assert_eq!(app.projection.aspect(), WIDTH as f32 / HEIGHT as f32);

    for (w, h) in [(800, 600), (1, 1000), (3840, 1600), (1280, 720)] {
        app.resize(w, h);
        assert_eq!(app.projection.aspect(), w as f32 / h as f32);
        assert_eq!(app.viewport, (w, h));
    }
}

#[test]
fn resize_is_idempotent() {
    let rt = runtime();
    let mut app = app_context(&rt);
    app.resize(1024, 768);
    let once = app.projection.clone();
    app.resize(1024, 768);
    assert_eq!(app.projection, once);
    assert_eq!(app.projection.calc_matrix(), once.calc_matrix());
}

#[test]
fn zero_sized_viewport_is_ignored() {
    let rt = runtime();
    let mut app = app_context(&rt);
    let before = app.projection.clone();
    app.resize(0, 720);
    app.resize(1280, 0);
    assert_eq!(app.projection, before);
    assert_eq!(app.viewport, (WIDTH, HEIGHT));
}

#[test]
fn resize_leaves_the_camera_alone() {
    let rt = runtime();
    let mut app = app_context(&rt);
    let camera = app.camera.clone();
    app.resize(640, 480);
    assert_eq!(app.camera, camera);
}

#[test]
fn camera_starts_behind_the_cell_looking_in() {
    let config = CameraConfig::default();
    let camera = Camera::from_config(&config);
    assert_eq!(camera.position, cgmath::Point3::new(0.0, 3.0, 5.0));

    let forward = camera.forward();
    assert_relative_eq!(forward.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(forward.y, 0.0, epsilon = 1e-6);
    assert_relative_eq!(forward.z, -1.0, epsilon = 1e-6);

    let projection = Projection::from_config(&config, WIDTH, HEIGHT);
    assert_relative_eq!(projection.fovy().0, 75f32.to_radians(), epsilon = 1e-6);
    assert_eq!(projection.znear(), 0.1);
    assert_eq!(projection.zfar(), 1000.0);
}

#[test]
fn projection_starts_valid_before_the_first_resize() {
    let config = CameraConfig::default();
    let projection = Projection::from_config(&config, 0, 0);
    assert_eq!(projection.aspect(), 1.0);
    assert_eq!(
        projection.calc_matrix(),
        Projection::from_config(&config, 500, 500).calc_matrix()
    );
}
