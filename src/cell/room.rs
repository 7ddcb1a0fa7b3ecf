//! Walls and floor of a 10 x 10 m cell, 5 m high.

use std::{
    f32::consts::FRAC_PI_2,
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

pub fn build(textures: &TextureSet) -> anyhow::Result<Fixture> {
    let mut room = Fixture::new();

    let wall_geometry = Rc::new(Geometry::cuboid(10.0, 5.0, 0.1)?);
    let wall_material = Rc::new(Material::new().with_texture(&textures.stone_wall));
    let walls = [
        // back
        Instance::at(0.0, 2.5, -5.0),
        // left
        Instance::at(-5.0, 2.5, 0.0).rotated(0.0, FRAC_PI_2, 0.0),
        // right
        Instance::at(5.0, 2.5, 0.0).rotated(0.0, -FRAC_PI_2, 0.0),
        // front
        Instance::at(0.0, 2.5, 5.0),
    ];
    for transform in walls {
        room.add_mesh(Mesh::new("wall", &wall_geometry, &wall_material, transform));
    }

    let floor_geometry = Rc::new(Geometry::plane(10.0, 10.0)?);
    let floor_material = Rc::new(Material::new().with_texture(&textures.concrete_floor));
    room.add_mesh(
        Mesh::new(
            "floor",
            &floor_geometry,
            &floor_material,
            Instance::new().rotated(-FRAC_PI_2, 0.0, 0.0),
        )
        .receives_shadow(),
    );

    Ok(room)
}
