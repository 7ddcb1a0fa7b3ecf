//! The prison cell: fixture builders and the assembler that composes them.
//!
//! Every builder takes the shared [`TextureSet`] and returns a [`Fixture`] or an
//! error. The assembler runs them in order and decides per fixture, through its
//! [`FixturePolicy`], whether a failure aborts startup or only leaves that
//! fixture out of the scene.

use anyhow::Context;

use crate::{
    config::Config,
    data_structures::scene_graph::{Fixture, Scene},
    resources::texture::TextureSet,
};

pub mod bathroom;
pub mod bunk_bed;
pub mod lighting;
pub mod room;
pub mod window;

/// What a failing fixture builder does to startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixturePolicy {
    /// Abort scene assembly with the builder's error.
    Fatal,
    /// Log the error and continue without the fixture.
    Degrade,
}

pub type FixtureBuilder = Box<dyn Fn(&TextureSet) -> anyhow::Result<Fixture>>;

pub struct SceneAssembler {
    builders: Vec<(String, FixtureBuilder)>,
}

impl SceneAssembler {
    /// An assembler without any fixtures.
    pub fn new() -> Self {
        Self {
            builders: Vec::new(),
        }
    }

    /// The complete cell: room, window, lighting, bunk bed and bathroom.
    pub fn cell() -> Self {
        Self::new()
            .with_fixture("room", room::build)
            .with_fixture("window", window::build)
            .with_fixture("lighting", lighting::build)
            .with_fixture("bunk_bed", bunk_bed::build)
            .with_fixture("bathroom", bathroom::build)
    }

    /// Registers `builder` under `name`, replacing an earlier builder of the same
    /// name in place.
    pub fn with_fixture<F>(mut self, name: &str, builder: F) -> Self
    where
        F: Fn(&TextureSet) -> anyhow::Result<Fixture> + 'static,
    {
        let builder: FixtureBuilder = Box::new(builder);
        match self.builders.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = builder,
            None => self.builders.push((name.to_string(), builder)),
        }
        self
    }

    pub fn fixture_names(&self) -> impl Iterator<Item = &str> {
        self.builders.iter().map(|(name, _)| name.as_str())
    }

    pub fn assemble(&self, textures: &TextureSet, config: &Config) -> anyhow::Result<Scene> {
        let mut scene = Scene::new();
        for (name, build) in &self.builders {
            let fixture = build(textures).with_context(|| format!("failed to build fixture {name}"));
            match (fixture, config.policy_for(name)) {
                (Ok(fixture), _) => {
                    log::debug!("fixture {} built with {} nodes", name, fixture.len());
                    scene.add_fixture(name, fixture);
                }
                (Err(e), FixturePolicy::Degrade) => {
                    log::error!("{:#}. The scene continues without it.", e);
                }
                (Err(e), FixturePolicy::Fatal) => return Err(e),
            }
        }
        log::info!(
            "scene assembled: {} meshes, {} lights",
            scene.meshes().count(),
            scene.lights().count()
        );
        Ok(scene)
    }
}

impl Default for SceneAssembler {
    fn default() -> Self {
        Self::cell()
    }
}
