//! One ambient fill light and two point lights.

use crate::{
    data_structures::{light::Light, scene_graph::Fixture},
    resources::texture::TextureSet,
};

pub fn build(_textures: &TextureSet) -> anyhow::Result<Fixture> {
    let mut lighting = Fixture::new();
    lighting.add_light(Light::ambient(0xffffff, 0.3));
    // Room light
    lighting.add_light(Light::point(0xffffff, 1.0, 100.0).at(2.0, 5.0, 3.0).casts_shadow());
    // Warm ceiling light above the bunk bed
    lighting.add_light(Light::point(0xfff1b8, 15.0, 50.0).at(0.0, 3.3, -3.0).casts_shadow());
    Ok(lighting)
}
