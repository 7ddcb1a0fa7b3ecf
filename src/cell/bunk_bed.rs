//! Two concrete bunks stacked in the back left corner, held by four poles.

use std::rc::Rc;

use crate::{
    data_structures::{
        geometry::Geometry,
        instance::Instance,
        material::Material,
        scene_graph::{Fixture, Mesh},
    },
    resources::texture::TextureSet,
};

const BED_X: f32 = -4.0;
const BED_Z: f32 = -2.5;
/// Bottom of each bunk's frame.
const BUNK_HEIGHTS: [f32; 2] = [0.25, 2.0];

pub fn build(textures: &TextureSet) -> anyhow::Result<Fixture> {
    let mut bed = Fixture::new();

    let frame_geometry = Rc::new(Geometry::cuboid(2.0, 0.5, 4.0)?);
    let frame_material = Rc::new(
        Material::new()
            .with_texture(&textures.concrete_bedframe)
            .with_roughness(0.8)
            .with_metalness(0.1),
    );

    let mattress_geometry = Rc::new(Geometry::cuboid(1.9, 0.25, 3.8)?);
    let mattress_material = Rc::new(
        Material::new()
            .with_texture(&textures.mattress)
            .with_color(0x00b3b3)
            .with_roughness(0.7),
    );

    let pillow_geometry = Rc::new(Geometry::cuboid(1.0, 0.2, 0.6)?);
    let pillow_material = Rc::new(
        Material::new()
            .with_texture(&textures.concrete_pillow)
            .with_roughness(0.6),
    );

    for y in BUNK_HEIGHTS {
        bed.add_mesh(
            Mesh::new(
                "bedframe",
                &frame_geometry,
                &frame_material,
                Instance::at(BED_X, y, BED_Z),
            )
            .casts_shadow(),
        );
        bed.add_mesh(
            Mesh::new(
                "mattress",
                &mattress_geometry,
                &mattress_material,
                Instance::at(BED_X, y + 0.375, BED_Z),
            )
            .casts_shadow(),
        );
        bed.add_mesh(
            Mesh::new(
                "pillow",
                &pillow_geometry,
                &pillow_material,
                Instance::at(BED_X, y + 0.49, -3.7),
            )
            .casts_shadow(),
        );
    }

    let pole_geometry = Rc::new(Geometry::cylinder(0.1, 0.1, 3.0, 16)?);
    let pole_material = Rc::new(
        Material::new()
            .with_texture(&textures.bunkbed_pole)
            .with_roughness(0.6),
    );
    for (x, z) in [(-3.0, -0.5), (-5.0, -0.5), (-3.0, -4.2), (-5.0, -4.2)] {
        bed.add_mesh(
            Mesh::new(
                "support_pole",
                &pole_geometry,
                &pole_material,
                Instance::at(x, 1.0, z),
            )
            .casts_shadow(),
        );
    }

    Ok(bed)
}
