//! GPU state.
//!
//! [`Renderer`] owns the device, the pipelines and everything uploaded for the
//! scene. [`Context`] adds the window and its surface on top and is the
//! [`SceneRenderer`] the application runs.
//!
//! The scene is uploaded on the first frame. Textures show up later: every frame
//! the renderer polls the texture handles of its materials and, once an image has
//! arrived, uploads it and rebuilds the bind groups of the materials using it.

use std::{iter, rc::Rc, sync::Arc};

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, Projection},
    config::Config,
    data_structures::{
        geometry::Geometry,
        material::{Material, material_layout},
        model::{DrawModel, GpuGeometry},
        scene_graph::Scene,
        texture::Texture,
    },
    pipelines::{
        basic::mk_basic_pipeline,
        light::{LightResources, LightUniform},
        transparent::mk_transparent_pipeline,
    },
    render::{Batch, Frame, Instanced, SceneRenderer, passes},
    resources::texture::{TextureHandle, TextureState},
};

#[derive(Debug)]
pub(crate) struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
}

#[derive(Debug)]
struct GpuMaterial {
    material: Rc<Material>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Whether the bind group holds the material's own image rather than the placeholder.
    textured: bool,
}

#[derive(Debug)]
struct GpuBatch {
    geometry: usize,
    material: usize,
    instance_buffer: wgpu::Buffer,
    amount: usize,
}

/// Everything uploaded for one scene.
#[derive(Debug)]
struct GpuScene {
    geometries: Vec<(Rc<Geometry>, GpuGeometry)>,
    materials: Vec<GpuMaterial>,
    textures: Vec<(TextureHandle, Rc<Texture>)>,
    opaque: Vec<GpuBatch>,
    transparent: Vec<GpuBatch>,
}

fn material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    fallback_sampler: &wgpu::Sampler,
    uniform_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(
                    texture.sampler.as_ref().unwrap_or(fallback_sampler),
                ),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
        label: Some("material_bind_group"),
    })
}

impl GpuScene {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        placeholder: &Texture,
        sampler: &wgpu::Sampler,
        scene: &Scene,
    ) -> Self {
        let mut gpu_scene = Self {
            geometries: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            opaque: Vec::new(),
            transparent: Vec::new(),
        };
        let passes = passes(scene);
        for b in &passes.opaque {
            let batch = gpu_scene.upload(device, layout, placeholder, sampler, b);
            gpu_scene.opaque.push(batch);
        }
        for b in &passes.transparent {
            let batch = gpu_scene.upload(device, layout, placeholder, sampler, b);
            gpu_scene.transparent.push(batch);
        }

        log::info!(
            "scene uploaded: {} geometries, {} materials, {} opaque and {} transparent draw calls",
            gpu_scene.geometries.len(),
            gpu_scene.materials.len(),
            gpu_scene.opaque.len(),
            gpu_scene.transparent.len()
        );
        gpu_scene
    }

    /// Uploads the instances of `b`, and its geometry and material unless an
    /// earlier batch already did.
    fn upload(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        placeholder: &Texture,
        sampler: &wgpu::Sampler,
        b: &Batch,
    ) -> GpuBatch {
        let geometry = match self
            .geometries
            .iter()
            .position(|(g, _)| Rc::ptr_eq(g, &b.geometry))
        {
            Some(i) => i,
            None => {
                self.geometries
                    .push((Rc::clone(&b.geometry), GpuGeometry::new(device, &b.geometry)));
                self.geometries.len() - 1
            }
        };
        let material = match self
            .materials
            .iter()
            .position(|m| Rc::ptr_eq(&m.material, &b.material))
        {
            Some(i) => i,
            None => {
                let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Material Buffer"),
                    contents: bytemuck::cast_slice(&[b.material.to_uniform()]),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let bind_group =
                    material_bind_group(device, layout, placeholder, sampler, &uniform_buffer);
                self.materials.push(GpuMaterial {
                    material: Rc::clone(&b.material),
                    uniform_buffer,
                    bind_group,
                    textured: false,
                });
                self.materials.len() - 1
            }
        };

        let instance_data = b.instances.iter().map(|i| i.to_raw()).collect::<Vec<_>>();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        GpuBatch {
            geometry,
            material,
            instance_buffer,
            amount: instance_data.len(),
        }
    }

    /// Binds every texture that finished loading since the last call.
    fn refresh_textures(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) {
        for material in self.materials.iter_mut().filter(|m| !m.textured) {
            let Some(handle) = material.material.texture.as_ref() else {
                continue;
            };
            if handle.poll() != TextureState::Loaded {
                continue;
            }
            let texture = match self.textures.iter().find(|(h, _)| h.ptr_eq(handle)) {
                Some((_, texture)) => Rc::clone(texture),
                None => {
                    let Some(image) = handle.image() else {
                        continue;
                    };
                    log::debug!("uploading texture {}", handle.path());
                    let texture = Rc::new(Texture::from_image(device, queue, &image, Some(handle.path())));
                    self.textures.push((handle.clone(), Rc::clone(&texture)));
                    texture
                }
            };
            material.bind_group =
                material_bind_group(device, layout, &texture, sampler, &material.uniform_buffer);
            material.textured = true;
        }
    }

    fn instanced<'s>(&'s self, b: &'s GpuBatch) -> Instanced<'s> {
        Instanced {
            instance: &b.instance_buffer,
            geometry: &self.geometries[b.geometry].1,
            material: &self.materials[b.material].bind_group,
            amount: b.amount,
        }
    }
}

/// Device, pipelines and uploaded scene data, independent of any window.
#[derive(Debug)]
pub struct Renderer {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub clear_colour: wgpu::Color,
    pub(crate) depth_texture: Texture,
    pub(crate) pipelines: Pipelines,
    pub camera: CameraResources,
    pub light: LightResources,
    material_layout: wgpu::BindGroupLayout,
    placeholder: Texture,
    sampler: wgpu::Sampler,
    scene: Option<GpuScene>,
}

impl Renderer {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        size: [u32; 2],
        clear_colour: wgpu::Color,
        camera: &Camera,
        projection: &Projection,
    ) -> Self {
        let camera = CameraResources::new(&device, camera, projection);
        let light = LightResources::new(&device, LightUniform::from_lights(iter::empty()));
        let material_layout = material_layout(&device);
        let pipelines = Pipelines {
            basic: mk_basic_pipeline(
                &device,
                format,
                &material_layout,
                &camera.bind_group_layout,
                &light.bind_group_layout,
            ),
            transparent: mk_transparent_pipeline(
                &device,
                format,
                &material_layout,
                &camera.bind_group_layout,
                &light.bind_group_layout,
            ),
        };
        let depth_texture = Texture::create_depth_texture(&device, size, "depth_texture");
        let placeholder = Texture::create_placeholder(&device, &queue);
        let sampler = crate::data_structures::texture::create_default_sampler(&device);

        Self {
            device,
            queue,
            clear_colour,
            depth_texture,
            pipelines,
            camera,
            light,
            material_layout,
            placeholder,
            sampler,
            scene: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.depth_texture =
            Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
    }

    /// Uploads the scene on first use and brings textures and camera up to date.
    fn prepare(&mut self, scene: &Scene, camera: &Camera, projection: &Projection) {
        if self.scene.is_none() {
            self.light
                .write(&self.queue, LightUniform::from_lights(scene.lights()));
            self.scene = Some(GpuScene::new(
                &self.device,
                &self.material_layout,
                &self.placeholder,
                &self.sampler,
                scene,
            ));
        }
        if let Some(gpu_scene) = self.scene.as_mut() {
            gpu_scene.refresh_textures(
                &self.device,
                &self.queue,
                &self.material_layout,
                &self.sampler,
            );
        }
        self.camera.write(&self.queue, camera, projection);
    }

    fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let Some(gpu_scene) = self.scene.as_ref() else {
            return;
        };
        for (pipeline, batches) in [
            (&self.pipelines.basic, &gpu_scene.opaque),
            (&self.pipelines.transparent, &gpu_scene.transparent),
        ] {
            render_pass.set_pipeline(pipeline);
            for instanced in batches.iter().map(|b| gpu_scene.instanced(b)) {
                if instanced.amount == 0 {
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_geometry_instanced(
                    instanced.geometry,
                    instanced.material,
                    0..instanced.amount as u32,
                    &self.camera.bind_group,
                    &self.light.bind_group,
                );
            }
        }
    }

    /// Draws one frame into `view`, using the renderer's depth buffer.
    pub fn draw(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        projection: &Projection,
        view: &wgpu::TextureView,
    ) {
        self.prepare(scene, camera, projection);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.encode(&mut encoder, view, &self.depth_texture.view);
        self.queue.submit(iter::once(encoder.finish()));
    }

    /// Number of materials whose own image is bound, i.e. not the placeholder.
    pub fn textured_materials(&self) -> usize {
        self.scene
            .as_ref()
            .map_or(0, |s| s.materials.iter().filter(|m| m.textured).count())
    }
}

#[cfg(feature = "integration-tests")]
impl Renderer {
    /// A renderer without a window, drawing to [`Renderer::OFFSCREEN_FORMAT`] targets.
    pub async fn headless(
        size: [u32; 2],
        clear_colour: wgpu::Color,
        camera: &Camera,
        projection: &Projection,
    ) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter available")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await
            .context("could not open the graphics device")?;
        Ok(Self::new(
            device,
            queue,
            Self::OFFSCREEN_FORMAT,
            size,
            clear_colour,
            camera,
            projection,
        ))
    }

    pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Renders one frame offscreen and reads it back.
    pub async fn render_to_image(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        projection: &Projection,
        width: u32,
        height: u32,
    ) -> anyhow::Result<image::RgbaImage> {
        use instant::Duration;

        self.prepare(scene, camera, projection);

        let extent3d = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth = Texture::create_depth_texture(&self.device, [width, height], "offscreen_depth");

        // Rows of a buffer copy must be aligned to 256 bytes
        let unpadded_row = 4 * width;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row = unpadded_row.div_ceil(align) * align;
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            size: (padded_row * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: Some("Offscreen Readback"),
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Encoder"),
            });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        self.encode(&mut encoder, &view, &depth.view);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            extent3d,
        );
        self.queue.submit(iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(Duration::from_secs(3)),
        })?;
        rx.receive()
            .await
            .context("readback channel closed")??;

        let data = buffer_slice.get_mapped_range();
        let pixels = data
            .chunks(padded_row as usize)
            .flat_map(|row| &row[..unpadded_row as usize])
            .copied()
            .collect::<Vec<u8>>();
        drop(data);
        output_buffer.unmap();

        image::RgbaImage::from_raw(width, height, pixels).context("readback has the wrong size")
    }
}

/// The renderer attached to a window surface.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub renderer: Renderer,
    is_surface_configured: bool,
}

impl Context {
    pub async fn new(
        window: Arc<Window>,
        config: &Config,
        camera: &Camera,
        projection: &Projection,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can present to this window")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await
            .context("could not open the graphics device")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shader outputs linear colour and relies on an sRGB surface to encode it.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture format")?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let renderer = Renderer::new(
            device,
            queue,
            surface_format,
            [size.width, size.height],
            config.clear_colour,
            camera,
            projection,
        );

        let mut ctx = Self {
            window,
            surface,
            surface_config,
            renderer,
            is_surface_configured: false,
        };
        ctx.resize(size.width, size.height);
        Ok(ctx)
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl SceneRenderer for Context {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.surface_config.width = width;
            self.surface_config.height = height;
            self.surface
                .configure(&self.renderer.device, &self.surface_config);
            self.renderer.resize(width, height);
            self.is_surface_configured = true;
        }
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        projection: &Projection,
    ) -> Result<Frame, wgpu::SurfaceError> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(Frame::Skipped);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer.draw(scene, camera, projection, &view);
        self.window.pre_present_notify();
        output.present();
        Ok(Frame::Presented)
    }
}
