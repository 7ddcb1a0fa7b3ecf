//! Startup configuration.
//!
//! Everything the scene needs at startup lives in [`Config`]. The defaults are
//! the literal values of the cell: camera framing, clear colour, the asset root
//! the textures are read from and the failure policy of every fixture builder.
//! There is no file, flag or environment variable behind it; callers construct
//! it in code and hand it to [`crate::flow::run`].

use std::collections::HashMap;

use crate::cell::FixturePolicy;

/// Perspective camera settings. Aspect is not part of it since it always
/// follows the viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub position: cgmath::Point3<f32>,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: cgmath::Point3::new(0.0, 3.0, 5.0),
            fovy: 75.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub title: String,
    pub clear_colour: wgpu::Color,
    /// Directory (native) or URL path segment (web) that texture paths are
    /// resolved against.
    pub asset_root: String,
    pub camera: CameraConfig,
    /// Failure policy per fixture name. Fixtures without an entry are fatal.
    pub fixture_policies: HashMap<String, FixturePolicy>,
}

impl Config {
    pub fn policy_for(&self, fixture: &str) -> FixturePolicy {
        self.fixture_policies
            .get(fixture)
            .copied()
            .unwrap_or(FixturePolicy::Fatal)
    }

    pub fn with_policy(mut self, fixture: &str, policy: FixturePolicy) -> Self {
        self.fixture_policies.insert(fixture.to_string(), policy);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        let fixture_policies = [
            ("room", FixturePolicy::Fatal),
            // The window is the only fixture the cell can live without.
            ("window", FixturePolicy::Degrade),
            ("bunk_bed", FixturePolicy::Fatal),
            ("bathroom", FixturePolicy::Fatal),
        ]
        .into_iter()
        .map(|(name, policy)| (name.to_string(), policy))
        .collect();
        Self {
            title: "Cell".to_string(),
            clear_colour: wgpu::Color::BLACK,
            asset_root: "assets".to_string(),
            camera: CameraConfig::default(),
            fixture_policies,
        }
    }
}
