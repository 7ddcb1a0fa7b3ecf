//! cell-ngin
//!
//! A static prison-cell scene rendered through a retained scene graph with
//! wgpu, natively and on the web. The cell is assembled once at startup from
//! fixture builders (room, window, lighting, bunk bed, bathroom) and then drawn
//! every display refresh until the window closes. Textures load in the
//! background and appear as they arrive.
//!
//! High-level modules
//! - `camera`: camera, projection and their uniform
//! - `cell`: fixture builders and the scene assembler with its failure policies
//! - `config`: startup configuration and its defaults
//! - `context`: GPU renderer and the window surface it presents to
//! - `data_structures`: geometries, materials, lights, instances and the scene graph
//! - `flow`: application context and the winit event loop
//! - `pipelines`: opaque and transparent render pipelines and the light uniform
//! - `render`: batching, opaque and transparent passes, and the render loop
//! - `resources`: asynchronous texture loading
//!

pub mod camera;
pub mod cell;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;

pub use cell::{FixturePolicy, SceneAssembler};
pub use config::{CameraConfig, Config};
pub use flow::{AppContext, run};
pub use render::{RenderLoop, SceneRenderer};
