use approx::assert_relative_eq;
use cell_ngin::{
    data_structures::light::Light,
    pipelines::light::{LightUniform, MAX_POINT_LIGHTS},
};

use crate::common::test_utils::{app_context, runtime};

mod common;

#[test]
fn cell_lights_pack_into_the_uniform() {
    let rt = runtime();
    let app = app_context(&rt);
    let uniform = LightUniform::from_lights(app.scene.lights());

    for channel in uniform.ambient() {
        assert_relative_eq!(channel, 0.3, epsilon = 1e-6);
    }
    assert_eq!(uniform.point_count(), 2);

    let (position_range, color_intensity) = uniform.point(0).unwrap();
    assert_eq!(position_range, [2.0, 5.0, 3.0, 100.0]);
    assert_eq!(color_intensity[3], 1.0);

    let (position_range, color_intensity) = uniform.point(1).unwrap();
    assert_eq!(position_range, [0.0, 3.3, -3.0, 50.0]);
    assert_eq!(color_intensity[3], 15.0);
    // Warm white: full red, less blue
    assert_relative_eq!(color_intensity[0], 1.0, epsilon = 1e-6);
    assert!(color_intensity[2] < color_intensity[1]);

    assert!(uniform.point(2).is_none());
}

#[test]
fn extra_point_lights_are_dropped() {
    let lights: Vec<Light> = (0..MAX_POINT_LIGHTS + 2)
        .map(|i| Light::point(0xffffff, 1.0, 10.0).at(i as f32, 0.0, 0.0))
        .collect();
    let uniform = LightUniform::from_lights(&lights);
    assert_eq!(uniform.point_count(), MAX_POINT_LIGHTS);
    assert_eq!(uniform.point(MAX_POINT_LIGHTS - 1).unwrap().0[0], 3.0);
}

#[test]
fn ambient_lights_add_up() {
    let lights = [Light::ambient(0xffffff, 0.2), Light::ambient(0xffffff, 0.1)];
    let uniform = LightUniform::from_lights(&lights);
    assert_relative_eq!(uniform.ambient()[1], 0.3, epsilon = 1e-6);
    assert_eq!(uniform.point_count(), 0);
}

#[test]
fn uniform_layout_matches_the_shader() {
    // vec4 ambient, u32 count + padding, then two arrays of four vec4s
    assert_eq!(std::mem::size_of::<LightUniform>(), 16 + 16 + 2 * 16 * MAX_POINT_LIGHTS);
}
