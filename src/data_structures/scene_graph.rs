//! Scene graph and fixture grouping.
//!
//! The scene is a flat, unordered collection of [`SceneNode`]s: meshes and
//! lights. Meshes that belong to one real-world object are built together as a
//! [`Fixture`] and enter the scene in one step, so a scene never holds part of
//! a fixture.
//!
//! Geometries and materials are shared through `Rc`. Meshes cloned from the same
//! `Rc` point at the same allocation, and the renderer relies on that identity
//! to draw them as one instanced batch.

use std::{ops::Range, rc::Rc};

use crate::data_structures::{
    geometry::Geometry, instance::Instance, light::Light, material::Material,
};

#[derive(Clone, Debug)]
pub struct Mesh {
    /// What the mesh represents, e.g. `window_bar`.
    pub name: String,
    pub geometry: Rc<Geometry>,
    pub material: Rc<Material>,
    pub transform: Instance,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(
        name: &str,
        geometry: &Rc<Geometry>,
        material: &Rc<Material>,
        transform: Instance,
    ) -> Self {
        Self {
            name: name.to_string(),
            geometry: Rc::clone(geometry),
            material: Rc::clone(material),
            transform,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn casts_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    pub fn receives_shadow(mut self) -> Self {
        self.receive_shadow = true;
        self
    }
}

#[derive(Clone, Debug)]
pub enum SceneNode {
    Mesh(Mesh),
    Light(Light),
}

impl SceneNode {
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            SceneNode::Mesh(mesh) => Some(mesh),
            SceneNode::Light(_) => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match self {
            SceneNode::Light(light) => Some(light),
            SceneNode::Mesh(_) => None,
        }
    }
}

/// Nodes of one fixture, built off-scene.
#[derive(Clone, Debug, Default)]
pub struct Fixture {
    nodes: Vec<SceneNode>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: Mesh) {
        self.nodes.push(SceneNode::Mesh(mesh));
    }

    pub fn add_light(&mut self, light: Light) {
        self.nodes.push(SceneNode::Light(light));
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Clone, Debug)]
struct FixtureEntry {
    name: String,
    nodes: Range<usize>,
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    fixtures: Vec<FixtureEntry>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fixture(&mut self, name: &str, fixture: Fixture) {
        let start = self.nodes.len();
        self.nodes.extend(fixture.nodes);
        self.fixtures.push(FixtureEntry {
            name: name.to_string(),
            nodes: start..self.nodes.len(),
        });
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.nodes.iter().filter_map(SceneNode::as_mesh)
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.nodes.iter().filter_map(SceneNode::as_light)
    }

    /// Meshes whose name is `name`.
    pub fn meshes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Mesh> + 'a {
        self.meshes().filter(move |mesh| mesh.name == name)
    }

    /// Nodes of the fixture added under `name`, if it made it into the scene.
    pub fn fixture(&self, name: &str) -> Option<&[SceneNode]> {
        self.fixtures
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &self.nodes[entry.nodes.clone()])
    }

    pub fn fixture_names(&self) -> impl Iterator<Item = &str> {
        self.fixtures.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
