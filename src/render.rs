//! Batching and the render loop.
//!
//! The scene is static, so the renderer groups its meshes once into [`Batch`]es:
//! every mesh sharing one geometry and one material `Rc` becomes an instance of
//! the same draw call. [`passes`] splits the batches between the opaque and the
//! transparent pipeline, and on the GPU each batch turns into an [`Instanced`] draw.
//!
//! [`RenderLoop`] drives any [`SceneRenderer`] once per display refresh.
//!

use std::rc::Rc;

use instant::{Duration, Instant};

use crate::{
    camera::{Camera, Projection},
    data_structures::{
        geometry::Geometry,
        instance::Instance,
        material::Material,
        model::GpuGeometry,
        scene_graph::Scene,
    },
    flow::AppContext,
};

/// Meshes that share one geometry and one material.
#[derive(Clone, Debug)]
pub struct Batch {
    pub geometry: Rc<Geometry>,
    pub material: Rc<Material>,
    pub instances: Vec<Instance>,
}

impl Batch {
    pub fn is_transparent(&self) -> bool {
        self.material.is_transparent()
    }
}

/// Groups the scene's meshes by geometry and material identity, in the order the
/// pairs first appear.
pub fn batch(scene: &Scene) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    for mesh in scene.meshes() {
        let existing = batches.iter_mut().find(|b| {
            Rc::ptr_eq(&b.geometry, &mesh.geometry) && Rc::ptr_eq(&b.material, &mesh.material)
        });
        match existing {
            Some(batch) => batch.instances.push(mesh.transform.clone()),
            None => batches.push(Batch {
                geometry: Rc::clone(&mesh.geometry),
                material: Rc::clone(&mesh.material),
                instances: vec![mesh.transform.clone()],
            }),
        }
    }
    batches
}

/// Batches split by the pipeline that draws them, each in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct Passes {
    pub opaque: Vec<Batch>,
    /// Drawn after every opaque batch, blended over them.
    pub transparent: Vec<Batch>,
}

pub fn passes(scene: &Scene) -> Passes {
    let (transparent, opaque) = batch(scene).into_iter().partition(Batch::is_transparent);
    Passes {
        opaque,
        transparent,
    }
}

/// Data for one instanced draw: geometry, material bind group and instance buffer.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub geometry: &'a GpuGeometry,
    pub material: &'a wgpu::BindGroup,
    pub amount: usize,
}

/// What a [`SceneRenderer`] did with a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
    Presented,
    /// Nothing was drawn, e.g. because the surface is not configured yet.
    Skipped,
}

/// Something that can draw the scene to a display surface.
pub trait SceneRenderer {
    /// Adapts the drawing surface to a new viewport size.
    fn resize(&mut self, width: u32, height: u32);

    /// Draws one frame of `scene` as seen through `camera` and `projection`.
    fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        projection: &Projection,
    ) -> Result<Frame, wgpu::SurfaceError>;
}

const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Drives a [`SceneRenderer`] once per refresh. It never stops on its own.
#[derive(Debug)]
pub struct RenderLoop {
    ticks: u64,
    presented: u64,
    skipped: u64,
    last_report: Instant,
    presented_since_report: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            presented: 0,
            skipped: 0,
            last_report: Instant::now(),
            presented_since_report: 0,
        }
    }

    /// Renders one frame. Surface errors are handled here and never end the loop.
    pub fn tick<R: SceneRenderer + ?Sized>(&mut self, app: &AppContext, renderer: &mut R) {
        self.ticks += 1;
        match renderer.render(&app.scene, &app.camera, &app.projection) {
            Ok(Frame::Presented) => {
                self.presented += 1;
                self.presented_since_report += 1;
            }
            Ok(Frame::Skipped) => self.skipped += 1,
            // Reconfigure the surface if it's lost or outdated
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("surface {}, reconfiguring", e);
                let (width, height) = app.viewport;
                renderer.resize(width, height);
            }
            Err(e) => {
                log::error!("Unable to render {}", e);
            }
        }

        let elapsed = self.last_report.elapsed();
        if elapsed >= REPORT_INTERVAL {
            log::debug!(
                "{:.1} fps",
                self.presented_since_report as f64 / elapsed.as_secs_f64()
            );
            self.last_report = Instant::now();
            self.presented_since_report = 0;
        }
    }

    /// Number of ticks so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of ticks that got a frame on screen.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}
