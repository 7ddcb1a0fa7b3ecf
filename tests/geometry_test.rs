use cell_ngin::data_structures::{
    geometry::{Geometry, MeshData},
    material::{Material, color_from_hex},
};
use cgmath::{InnerSpace, Vector3};

fn v(p: [f32; 3]) -> Vector3<f32> {
    Vector3::from(p)
}

/// Asserts that every non-degenerate triangle winds counter-clockwise around
/// its vertex normals.
fn assert_front_faces_match_normals(data: &MeshData) {
    for tri in data.indices.chunks(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| &data.vertices[i as usize]);
        let face = (v(b.position) - v(a.position)).cross(v(c.position) - v(a.position));
        if face.magnitude() < 1e-9 {
            continue;
        }
        let normal = v(a.normal) + v(b.normal) + v(c.normal);
        assert!(face.dot(normal) > 0.0, "triangle {tri:?} faces away from its normal");
    }
}

#[test]
fn degenerate_parameters_are_rejected() {
    assert!(Geometry::cuboid(0.0, 1.0, 1.0).is_err());
    assert!(Geometry::cuboid(1.0, -1.0, 1.0).is_err());
    assert!(Geometry::cuboid(1.0, 1.0, f32::NAN).is_err());
    assert!(Geometry::plane(f32::INFINITY, 1.0).is_err());
    assert!(Geometry::cylinder(0.0, 0.0, 1.0, 16).is_err());
    assert!(Geometry::cylinder(0.1, -0.1, 1.0, 16).is_err());
    assert!(Geometry::cylinder(0.1, 0.1, 1.0, 2).is_err());
    assert!(Geometry::circle(0.4, 2).is_err());
    assert!(Geometry::circle(0.0, 32).is_err());

    assert!(Geometry::cylinder(0.0, 0.1, 1.0, 3).is_ok());
    let err = Geometry::cuboid(1.0, 0.0, 1.0).unwrap_err();
    assert!(err.to_string().contains("box height"));
}

#[test]
fn box_faces_point_outward() {
    let data = Geometry::cuboid(2.0, 0.5, 4.0).unwrap().tessellate();
    assert_eq!(data.vertices.len(), 24);
    assert_eq!(data.indices.len(), 36);
    assert_front_faces_match_normals(&data);

    for vertex in &data.vertices {
        let p = v(vertex.position);
        assert!(p.dot(v(vertex.normal)) > 0.0);
        assert!(p.x.abs() <= 1.0 && p.y.abs() <= 0.25 && p.z.abs() <= 2.0);
    }
}

#[test]
fn plane_and_circle_face_positive_z() {
    for geometry in [
        Geometry::plane(10.0, 10.0).unwrap(),
        Geometry::circle(0.4, 32).unwrap(),
    ] {
        let data = geometry.tessellate();
        assert_front_faces_match_normals(&data);
        assert!(data.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert!(data.vertices.iter().all(|v| v.position[2] == 0.0));
    }

    let circle = Geometry::circle(0.4, 32).unwrap().tessellate();
    assert_eq!(circle.indices.len(), 32 * 3);
    let max_radius = circle
        .vertices
        .iter()
        .map(|vertex| v(vertex.position).magnitude())
        .fold(0.0, f32::max);
    approx::assert_relative_eq!(max_radius, 0.4, epsilon = 1e-6);
}

#[test]
fn cylinder_sides_and_caps_point_outward() {
    let data = Geometry::cylinder(0.4, 0.3, 0.9, 32).unwrap().tessellate();
    assert_front_faces_match_normals(&data);
    // side, top cap, bottom cap
    assert_eq!(data.indices.len(), 32 * 6 + 32 * 3 * 2);

    let ys: Vec<f32> = data.vertices.iter().map(|v| v.position[1]).collect();
    approx::assert_relative_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 0.45);
    approx::assert_relative_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), -0.45);
}

#[test]
fn cone_skips_the_missing_cap() {
    let data = Geometry::cylinder(0.0, 0.2, 1.0, 8).unwrap().tessellate();
    assert_front_faces_match_normals(&data);
    assert_eq!(data.indices.len(), 8 * 6 + 8 * 3);
}

#[test]
fn hex_colours_are_converted_to_linear() {
    for channel in color_from_hex(0xffffff) {
        approx::assert_relative_eq!(channel, 1.0, epsilon = 1e-6);
    }
    assert_eq!(color_from_hex(0x000000), [0.0, 0.0, 0.0]);
    let [r, g, b] = color_from_hex(0x808080);
    approx::assert_relative_eq!(r, 0.2159, epsilon = 1e-3);
    assert_eq!(r, g);
    assert_eq!(g, b);
}

#[test]
fn material_defaults_and_builders() {
    let material = Material::new();
    assert_eq!(material.color, [1.0, 1.0, 1.0]);
    assert_eq!(material.roughness, 1.0);
    assert_eq!(material.metalness, 0.0);
    assert_eq!(material.opacity, 1.0);
    assert!(!material.is_transparent());
    assert!(material.texture.is_none());

    let glass = Material::new().transparent(0.8).with_roughness(0.2);
    assert!(glass.is_transparent());
    assert_eq!(glass.opacity, 0.8);
    assert_eq!(glass.roughness, 0.2);
}
