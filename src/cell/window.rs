//! The barred window in the back wall: a translucent pane, five iron bars and a
//! four-piece steel frame.

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

const CENTER_Y: f32 = 3.5;
const BAR_SPACING: f32 = 0.45;

pub fn build(textures: &TextureSet) -> anyhow::Result<Fixture> {
    let mut window = Fixture::new();

    let pane_geometry = Rc::new(Geometry::plane(2.0, 1.2)?);
    let pane_material = Rc::new(
        Material::new()
            .with_texture(&textures.window)
            .transparent(0.8),
    );
    window.add_mesh(Mesh::new(
        "window_pane",
        &pane_geometry,
        &pane_material,
        Instance::at(0.0, CENTER_Y, -4.95),
    ));

    let bar_geometry = Rc::new(Geometry::cuboid(0.13, 1.2, 0.05)?);
    let bar_material = Rc::new(Material::new().with_texture(&textures.iron_bar));
    for i in -2..=2 {
        let x = i as f32 * BAR_SPACING;
        window.add_mesh(
            Mesh::new(
                "window_bar",
                &bar_geometry,
                &bar_material,
                Instance::at(x, CENTER_Y, -4.92),
            )
            .casts_shadow(),
        );
    }

    let frame_material = Rc::new(Material::new().with_texture(&textures.steel_frame));
    let horizontal = Rc::new(Geometry::cuboid(2.1, 0.1, 0.1)?);
    let vertical = Rc::new(Geometry::cuboid(0.1, 1.3, 0.1)?);
    let frame = [
        (&horizontal, Instance::at(0.0, 4.1, -4.92)),
        (&horizontal, Instance::at(0.0, 2.9, -4.92)),
        (&vertical, Instance::at(-1.05, CENTER_Y, -4.92)),
        (&vertical, Instance::at(1.05, CENTER_Y, -4.92)),
    ];
    for (geometry, transform) in frame {
        window.add_mesh(
            Mesh::new("window_frame", geometry, &frame_material, transform).casts_shadow(),
        );
    }

    Ok(window)
}
