#![allow(dead_code)]

use std::{
    ops::{Deref, DerefMut},
    thread,
    time::{Duration, Instant},
};

use cell_ngin::{
    AppContext, Config, SceneAssembler, SceneRenderer,
    camera::{Camera, Projection},
    data_structures::scene_graph::Scene,
    render::Frame,
    resources::texture::{TextureHandle, TextureProvider, TextureState},
};
use tempfile::TempDir;

pub const WIDTH: u32 = 1920;
pub const HEIGHT: u32 = 1080;

/// Runtime the texture loads run on. Its worker threads make progress while
/// the test thread polls.
pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

/// A fresh, empty directory that is removed when dropped.
pub fn temp_dir(name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("cell-ngin-{name}-"))
        .tempdir()
        .unwrap()
}

/// Provider over an asset root without any files, so every texture fails.
/// The directory lives as long as the returned guard.
pub fn provider_without_assets(rt: &tokio::runtime::Runtime) -> (TempDir, TextureProvider) {
    let root = temp_dir("no-assets");
    let provider = TextureProvider::new(root.path().to_string_lossy(), rt.handle().clone());
    (root, provider)
}

/// An [`AppContext`] together with the empty asset directory it reads from.
#[derive(Debug)]
pub struct TestApp {
    pub app: AppContext,
    _assets: TempDir,
}

impl Deref for TestApp {
    type Target = AppContext;

    fn deref(&self) -> &AppContext {
        &self.app
    }
}

impl DerefMut for TestApp {
    fn deref_mut(&mut self) -> &mut AppContext {
        &mut self.app
    }
}

pub fn app_context(rt: &tokio::runtime::Runtime) -> TestApp {
    app_context_with(rt, &Config::default(), &SceneAssembler::cell()).unwrap()
}

pub fn app_context_with(
    rt: &tokio::runtime::Runtime,
    config: &Config,
    assembler: &SceneAssembler,
) -> anyhow::Result<TestApp> {
    let (assets, provider) = provider_without_assets(rt);
    let app = AppContext::with_assembler(config, provider, assembler, WIDTH, HEIGHT)?;
    Ok(TestApp {
        app,
        _assets: assets,
    })
}

/// Polls `handle` until it settles or five seconds pass.
pub fn wait_for(handle: &TextureHandle) -> TextureState {
    let start = Instant::now();
    loop {
        let state = handle.poll();
        if state != TextureState::Pending || start.elapsed() > Duration::from_secs(5) {
            return state;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

/// Records what it was asked to render instead of touching a GPU.
#[derive(Default)]
pub struct MockRenderer {
    pub frames: Vec<(*const Scene, *const Camera, *const Projection)>,
    pub resizes: Vec<(u32, u32)>,
    /// Number of next renders that report a skipped frame, before any error.
    pub skipped: usize,
    /// Errors returned by the next renders, front first.
    pub errors: Vec<wgpu::SurfaceError>,
}

impl SceneRenderer for MockRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        projection: &Projection,
    ) -> Result<Frame, wgpu::SurfaceError> {
        self.frames.push((
            scene as *const Scene,
            camera as *const Camera,
            projection as *const Projection,
        ));
        if self.skipped > 0 {
            self.skipped -= 1;
            Ok(Frame::Skipped)
        } else if self.errors.is_empty() {
            Ok(Frame::Presented)
        } else {
            Err(self.errors.remove(0))
        }
    }
}
