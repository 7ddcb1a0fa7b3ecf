//! Render pipelines.
//!
//! - `basic` draws opaque meshes and provides the shared pipeline builder
//! - `transparent` draws blended meshes after the opaque ones
//! - `light` packs the scene's lights into a uniform

pub mod basic;
pub mod light;
pub mod transparent;
