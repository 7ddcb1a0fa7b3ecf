//! Toilet and sink against the back wall on the right.

use std::{
    f32::consts::{FRAC_PI_2, PI},
    rc::Rc,
};

use crate::{
    data_structures::{
        geometry::Geometry,
        instance::Instance,
        material::Material,
        scene_graph::{Fixture, Mesh},
    },
    resources::texture::TextureSet,
};

fn part(
    fixture: &mut Fixture,
    name: &str,
    geometry: Geometry,
    material: Material,
    transform: Instance,
) {
    fixture.add_mesh(
        Mesh::new(name, &Rc::new(geometry), &Rc::new(material), transform).casts_shadow(),
    );
}

pub fn build(textures: &TextureSet) -> anyhow::Result<Fixture> {
    let mut bathroom = Fixture::new();

    // Toilet
    part(
        &mut bathroom,
        "toilet_bowl",
        Geometry::cylinder(0.4, 0.3, 0.9, 32)?,
        Material::new()
            .with_texture(&textures.toilet)
            .with_roughness(0.8),
        Instance::at(2.5, 0.4, -4.5),
    );
    part(
        &mut bathroom,
        "toilet_seat",
        Geometry::circle(0.4, 32)?,
        Material::new().with_color(0x404040).with_roughness(0.6),
        Instance::at(2.5, 1.2, -4.7).rotated(-PI / 180.0, 0.0, 0.0),
    );
    part(
        &mut bathroom,
        "toilet_hole",
        Geometry::circle(0.2, 32)?,
        Material::new().with_color(0x000000).with_roughness(0.6),
        Instance::at(2.5, 0.855, -4.45).rotated(-FRAC_PI_2, 0.0, 0.0),
    );

    // Sink
    part(
        &mut bathroom,
        "sink_basin",
        Geometry::cuboid(1.0, 0.2, 0.5)?,
        Material::new().with_color(0xffffff).with_roughness(0.8),
        Instance::at(3.7, 1.5, -3.5),
    );
    part(
        &mut bathroom,
        "sink_hole",
        Geometry::cuboid(0.6, 0.05, 0.3)?,
        Material::new().with_color(0x262626).with_roughness(0.8),
        Instance::at(3.7, 1.6, -3.5),
    );
    part(
        &mut bathroom,
        "sink_stand",
        Geometry::cylinder(0.15, 0.15, 1.2, 32)?,
        Material::new().with_color(0x808080).with_roughness(0.6),
        Instance::at(3.7, 0.8, -3.5),
    );

    // Faucet
    let chrome = || Material::new().with_color(0x808080).with_roughness(0.4);
    part(
        &mut bathroom,
        "faucet_base",
        Geometry::cylinder(0.05, 0.05, 0.1, 16)?,
        chrome(),
        Instance::at(3.85, 1.63, -4.0),
    );
    part(
        &mut bathroom,
        "faucet_pipe",
        Geometry::cylinder(0.025, 0.025, 0.3, 16)?,
        chrome(),
        Instance::at(3.85, 1.75, -4.0).rotated(-FRAC_PI_2, 0.0, 0.0),
    );
    part(
        &mut bathroom,
        "faucet_spout",
        Geometry::cylinder(0.025, 0.025, 0.3, 16)?,
        chrome(),
        Instance::at(3.85, 1.6, -4.0),
    );

    Ok(bathroom)
}
