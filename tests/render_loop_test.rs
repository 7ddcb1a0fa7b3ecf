use cell_ngin::{
    RenderLoop,
    data_structures::scene_graph::Scene,
    render::{batch, passes},
};

use crate::common::test_utils::{HEIGHT, MockRenderer, WIDTH, app_context, runtime};

mod common;

#[test]
fn every_tick_renders_the_same_scene() {
    let rt = runtime();
    let app = app_context(&rt);
    let mut renderer = MockRenderer::default();
    let mut render_loop = RenderLoop::new();

    const N: usize = 120;
    for _ in 0..N {
        render_loop.tick(&app, &mut renderer);
    }

    assert_eq!(renderer.frames.len(), N);
    assert_eq!(render_loop.ticks(), N as u64);
    assert_eq!(render_loop.presented(), N as u64);
    for (scene, camera, projection) in &renderer.frames {
        assert!(std::ptr::eq(*scene, &app.scene));
        assert!(std::ptr::eq(*camera, &app.camera));
        assert!(std::ptr::eq(*projection, &app.projection));
    }
    assert_eq!(render_loop.skipped(), 0);
    assert!(renderer.resizes.is_empty());
}

#[test]
fn frames_before_the_surface_is_configured_are_not_presented() {
    let rt = runtime();
    let app = app_context(&rt);
    let mut renderer = MockRenderer {
        skipped: 2,
        ..Default::default()
    };
    let mut render_loop = RenderLoop::new();

    for _ in 0..5 {
        render_loop.tick(&app, &mut renderer);
    }

    assert_eq!(render_loop.ticks(), 5);
    assert_eq!(render_loop.skipped(), 2);
    assert_eq!(render_loop.presented(), 3);
    assert!(renderer.resizes.is_empty());
}

#[test]
fn lost_surface_is_reconfigured_and_the_loop_goes_on() {
    let rt = runtime();
    let mut app = app_context(&rt);
    app.resize(800, 600);
    let mut renderer = MockRenderer {
        errors: vec![wgpu::SurfaceError::Lost, wgpu::SurfaceError::Outdated],
        ..Default::default()
    };
    let mut render_loop = RenderLoop::new();

    for _ in 0..5 {
        render_loop.tick(&app, &mut renderer);
    }

    assert_eq!(renderer.frames.len(), 5);
    assert_eq!(render_loop.presented(), 3);
    assert_eq!(renderer.resizes, [(800, 600), (800, 600)]);
}

#[test]
fn other_surface_errors_skip_the_frame() {
    let rt = runtime();
    let app = app_context(&rt);
    let mut renderer = MockRenderer {
        errors: vec![wgpu::SurfaceError::Timeout],
        ..Default::default()
    };
    let mut render_loop = RenderLoop::new();

    render_loop.tick(&app, &mut renderer);
    render_loop.tick(&app, &mut renderer);

    assert_eq!(render_loop.ticks(), 2);
    assert_eq!(render_loop.presented(), 1);
    assert!(renderer.resizes.is_empty());
    assert_eq!(app.viewport, (WIDTH, HEIGHT));
}

#[test]
fn shared_parts_become_one_instanced_draw() {
    let rt = runtime();
    let app = app_context(&rt);
    let batches = batch(&app.scene);

    assert_eq!(batches.len(), 19);
    assert_eq!(batches.iter().map(|b| b.instances.len()).sum::<usize>(), 34);

    let bar = app.scene.meshes_named("window_bar").next().unwrap();
    let bars = batches
        .iter()
        .find(|b| std::rc::Rc::ptr_eq(&b.geometry, &bar.geometry))
        .unwrap();
    assert_eq!(bars.instances.len(), 5);

    let transparent: Vec<_> = batches.iter().filter(|b| b.is_transparent()).collect();
    assert_eq!(transparent.len(), 1);
    assert_eq!(transparent[0].instances.len(), 1);

    // Batches keep the order in which their first mesh was added
    assert_eq!(batches[0].instances.len(), 4);
    assert_eq!(batches[0].geometry.kind(), "box");
    assert_eq!(batches[1].geometry.kind(), "plane");
}

#[test]
fn the_pane_is_the_only_transparent_draw() {
    let rt = runtime();
    let app = app_context(&rt);
    let passes = passes(&app.scene);

    assert_eq!(passes.opaque.len(), 18);
    assert_eq!(passes.transparent.len(), 1);
    assert!(passes.opaque.iter().all(|b| !b.is_transparent()));

    let pane = app.scene.meshes_named("window_pane").next().unwrap();
    assert!(std::rc::Rc::ptr_eq(&passes.transparent[0].material, &pane.material));

    // Opaque batches keep their first-seen order
    let expected: Vec<_> = batch(&app.scene)
        .into_iter()
        .filter(|b| !b.is_transparent())
        .map(|b| b.instances.len())
        .collect();
    let actual: Vec<_> = passes.opaque.iter().map(|b| b.instances.len()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn empty_scene_has_no_batches() {
    assert!(batch(&Scene::new()).is_empty());
    let empty = passes(&Scene::new());
    assert!(empty.opaque.is_empty() && empty.transparent.is_empty());
}
