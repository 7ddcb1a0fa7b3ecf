//! Application state and event loop.
//!
//! [`AppContext`] is everything the cell needs at runtime besides the GPU: the
//! assembled scene, the camera and its projection, and the texture provider
//! feeding the materials. It is built once when the window comes up and then
//! handed by reference to the render loop and the resize handler.
//!
//! [`App`] is the winit [`ApplicationHandler`] that owns both the application
//! context and the GPU [`Context`]:
//! 1. `resumed` opens the window, assembles the scene and sets up the GPU
//! 2. `Resized` updates the projection and reconfigures the surface
//! 3. `RedrawRequested` renders one frame and requests the next
//! 4. `CloseRequested` leaves the event loop

use std::sync::Arc;

use anyhow::Context as _;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    camera::{Camera, Projection},
    cell::SceneAssembler,
    config::Config,
    context::Context,
    data_structures::scene_graph::Scene,
    render::{RenderLoop, SceneRenderer},
    resources::texture::{TextureProvider, TextureSet},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// The running cell, minus the GPU.
#[derive(Debug)]
pub struct AppContext {
    pub scene: Scene,
    pub camera: Camera,
    pub projection: Projection,
    pub textures: TextureProvider,
    pub texture_set: TextureSet,
    /// Current viewport size in physical pixels.
    pub viewport: (u32, u32),
}

impl AppContext {
    /// Starts the texture loads and assembles the whole cell.
    pub fn new(
        config: &Config,
        textures: TextureProvider,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        Self::with_assembler(config, textures, &SceneAssembler::cell(), width, height)
    }

    pub fn with_assembler(
        config: &Config,
        mut textures: TextureProvider,
        assembler: &SceneAssembler,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let texture_set = TextureSet::load(&mut textures);
        let scene = assembler.assemble(&texture_set, config)?;
        Ok(Self {
            scene,
            camera: Camera::from_config(&config.camera),
            projection: Projection::from_config(&config.camera, width, height),
            textures,
            texture_set,
            viewport: (width, height),
        })
    }

    /// Follows a viewport resize. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.projection.resize(width, height);
    }
}

/// Application context and GPU context, once both exist.
#[derive(Debug)]
pub struct AppState {
    pub app: AppContext,
    pub ctx: Context,
}

pub(crate) enum AppEvent {
    /// The GPU context finished setting up (web only, where it cannot block).
    #[allow(dead_code)]
    Initialized(anyhow::Result<Context>),
}

impl std::fmt::Debug for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(Ok(_)) => f.write_str("Initialized(Ok)"),
            Self::Initialized(Err(e)) => write!(f, "Initialized(Err({e}))"),
        }
    }
}

pub struct App {
    config: Config,
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<AppEvent>,
    state: Option<AppState>,
    // Waits here for its GPU context on the web
    #[allow(dead_code)]
    pending: Option<AppContext>,
    render_loop: RenderLoop,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>, config: Config) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime =
            tokio::runtime::Runtime::new().context("could not start the async runtime")?;
        Ok(Self {
            config,
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            pending: None,
            render_loop: RenderLoop::new(),
            error: None,
        })
    }

    fn texture_provider(&self) -> TextureProvider {
        TextureProvider::new(
            self.config.asset_root.clone(),
            #[cfg(not(target_arch = "wasm32"))]
            self.async_runtime.handle().clone(),
        )
    }

    /// Stops the event loop and keeps `error` to return it from [`run`].
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        // Natively the caller of `run` reports it. On the web `run_app` never returns.
        #[cfg(target_arch = "wasm32")]
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.config.title);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            window_attributes = window_attributes.with_append(true);
        }

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("could not open a window")?,
        );
        let size = window.inner_size();
        let app = AppContext::new(&self.config, self.texture_provider(), size.width, size.height)?;

        #[cfg(not(target_arch = "wasm32"))]
        {
            let ctx = self.async_runtime.block_on(Context::new(
                window,
                &self.config,
                &app.camera,
                &app.projection,
            ))?;
            ctx.window().request_redraw();
            self.state = Some(AppState { app, ctx });
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            let camera = app.camera.clone();
            let projection = app.projection.clone();
            self.pending = Some(app);
            wasm_bindgen_futures::spawn_local(async move {
                let ctx = Context::new(window, &config, &camera, &projection).await;
                if proxy.send_event(AppEvent::Initialized(ctx)).is_err() {
                    log::error!("the event loop closed before the GPU was ready");
                }
            });
        }

        Ok(())
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Initialized(Ok(mut ctx)) => {
                let Some(mut app) = self.pending.take() else {
                    return;
                };
                // Trigger a resize now that we are initialized
                let size = ctx.window().inner_size();
                app.resize(size.width, size.height);
                ctx.resize(size.width, size.height);
                ctx.window().request_redraw();
                self.state = Some(AppState { app, ctx });
            }
            AppEvent::Initialized(Err(e)) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed after {} frames", self.render_loop.ticks());
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                state.app.resize(size.width, size.height);
                state.ctx.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.render_loop.tick(&state.app, &mut state.ctx);
                // Schedule the next frame
                state.ctx.window().request_redraw();
            }
            _ => {}
        }
    }
}

/// Opens the window and renders the cell until the window is closed.
///
/// Fails if the scene cannot be assembled under the configured fixture policies
/// or if no GPU is available.
pub fn run(config: Config) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {e}").into());
        }
    }

    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    run(Config::default()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
