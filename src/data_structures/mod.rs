//! Engine data structures: geometries, materials, lights, textures and the scene graph.
//!
//! - `geometry` holds shape descriptors and their tessellation
//! - `material` holds shading parameters and the material bind group layout
//! - `model` holds the vertex layout, uploaded geometry and the instanced draw call
//! - `instance` holds per-mesh transformation data
//! - `light` holds ambient and point lights
//! - `scene_graph` holds meshes, fixtures and the scene
//! - `texture` holds the GPU texture wrapper and creation utilities

pub mod geometry;
pub mod instance;
pub mod light;
pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
