//! Shape descriptors and their tessellation.
//!
//! A [`Geometry`] only describes a shape. It is validated when it is built and
//! turned into triangles by [`Geometry::tessellate`] once it reaches the GPU.
//! Shapes are centered on the origin:
//!
//! - cuboids extend along all three axes,
//! - planes and circles lie in the XY plane facing +Z,
//! - cylinders stand along Y.
//!
//! Front faces wind counter-clockwise.

use anyhow::bail;
use cgmath::{InnerSpace, Vector3};

use crate::data_structures::model::ModelVertex;

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Circle {
        radius: f32,
        segments: u32,
    },
}

/// CPU-side triangle list of a geometry.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

fn extent(name: &str, value: f32) -> anyhow::Result<f32> {
    if !value.is_finite() || value <= 0.0 {
        bail!("{name} must be a positive finite number, got {value}");
    }
    Ok(value)
}

fn segments(name: &str, value: u32) -> anyhow::Result<u32> {
    if value < 3 {
        bail!("{name} needs at least 3 segments, got {value}");
    }
    Ok(value)
}

impl Geometry {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> anyhow::Result<Self> {
        Ok(Self::Cuboid {
            width: extent("box width", width)?,
            height: extent("box height", height)?,
            depth: extent("box depth", depth)?,
        })
    }

    pub fn plane(width: f32, height: f32) -> anyhow::Result<Self> {
        Ok(Self::Plane {
            width: extent("plane width", width)?,
            height: extent("plane height", height)?,
        })
    }

    /// A cylinder (or truncated cone). One of the radii may be zero.
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> anyhow::Result<Self> {
        for (name, radius) in [("top radius", radius_top), ("bottom radius", radius_bottom)] {
            if !radius.is_finite() || radius < 0.0 {
                bail!("cylinder {name} must be a non-negative finite number, got {radius}");
            }
        }
        if radius_top == 0.0 && radius_bottom == 0.0 {
            bail!("cylinder needs at least one non-zero radius");
        }
        Ok(Self::Cylinder {
            radius_top,
            radius_bottom,
            height: extent("cylinder height", height)?,
            radial_segments: segments("cylinder", radial_segments)?,
        })
    }

    pub fn circle(radius: f32, segments_count: u32) -> anyhow::Result<Self> {
        Ok(Self::Circle {
            radius: extent("circle radius", radius)?,
            segments: segments("circle", segments_count)?,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Cuboid { .. } => "box",
            Geometry::Plane { .. } => "plane",
            Geometry::Cylinder { .. } => "cylinder",
            Geometry::Circle { .. } => "circle",
        }
    }

    pub fn tessellate(&self) -> MeshData {
        let mut data = MeshData::default();
        match *self {
            Geometry::Cuboid {
                width,
                height,
                depth,
            } => {
                let half = Vector3::new(width, height, depth) / 2.0;
                // (normal, u, v) with u x v == normal
                let faces = [
                    (Vector3::unit_x(), -Vector3::unit_z(), Vector3::unit_y()),
                    (-Vector3::unit_x(), Vector3::unit_z(), Vector3::unit_y()),
                    (Vector3::unit_y(), Vector3::unit_x(), -Vector3::unit_z()),
                    (-Vector3::unit_y(), Vector3::unit_x(), Vector3::unit_z()),
                    (Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y()),
                    (-Vector3::unit_z(), -Vector3::unit_x(), Vector3::unit_y()),
                ];
                for (normal, u, v) in faces {
                    let reach = |axis: Vector3<f32>| {
                        axis.x.abs() * half.x + axis.y.abs() * half.y + axis.z.abs() * half.z
                    };
                    let center = normal * reach(normal);
                    push_quad(&mut data, center, u * reach(u), v * reach(v), normal);
                }
            }
            Geometry::Plane { width, height } => {
                push_quad(
                    &mut data,
                    Vector3::new(0.0, 0.0, 0.0),
                    Vector3::unit_x() * (width / 2.0),
                    Vector3::unit_y() * (height / 2.0),
                    Vector3::unit_z(),
                );
            }
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => {
                push_cylinder_side(&mut data, radius_top, radius_bottom, height, radial_segments);
                if radius_top > 0.0 {
                    push_cylinder_cap(&mut data, radius_top, height / 2.0, radial_segments, true);
                }
                if radius_bottom > 0.0 {
                    push_cylinder_cap(&mut data, radius_bottom, -height / 2.0, radial_segments, false);
                }
            }
            Geometry::Circle { radius, segments } => {
                let center = data.vertices.len() as u32;
                data.vertices.push(vertex(
                    Vector3::new(0.0, 0.0, 0.0),
                    [0.5, 0.5],
                    Vector3::unit_z(),
                ));
                for i in 0..=segments {
                    let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
                    let (sin, cos) = theta.sin_cos();
                    data.vertices.push(vertex(
                        Vector3::new(radius * cos, radius * sin, 0.0),
                        [(cos + 1.0) / 2.0, 1.0 - (sin + 1.0) / 2.0],
                        Vector3::unit_z(),
                    ));
                }
                for i in 1..=segments {
                    data.indices
                        .extend_from_slice(&[center, center + i, center + i + 1]);
                }
            }
        }
        data
    }
}

fn vertex(position: Vector3<f32>, tex_coords: [f32; 2], normal: Vector3<f32>) -> ModelVertex {
    ModelVertex {
        position: position.into(),
        tex_coords,
        normal: normal.into(),
    }
}

/// Quad around `center` spanning `±u` and `±v`, facing `normal`.
fn push_quad(
    data: &mut MeshData,
    center: Vector3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
    normal: Vector3<f32>,
) {
    let base = data.vertices.len() as u32;
    // wgpu samples with v = 0 at the top of the image
    data.vertices.extend([
        vertex(center - u - v, [0.0, 1.0], normal),
        vertex(center + u - v, [1.0, 1.0], normal),
        vertex(center + u + v, [1.0, 0.0], normal),
        vertex(center - u + v, [0.0, 0.0], normal),
    ]);
    data.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

fn push_cylinder_side(
    data: &mut MeshData,
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) {
    let base = data.vertices.len() as u32;
    let slope = (radius_bottom - radius_top) / height;
    // Two rows: top ring first, then bottom ring. Angle 0 points at +Z.
    for (radius, y, v) in [(radius_top, height / 2.0, 0.0), (radius_bottom, -height / 2.0, 1.0)] {
        for i in 0..=radial_segments {
            let u = i as f32 / radial_segments as f32;
            let (sin, cos) = (u * std::f32::consts::TAU).sin_cos();
            data.vertices.push(vertex(
                Vector3::new(radius * sin, y, radius * cos),
                [u, v],
                Vector3::new(sin, slope, cos).normalize(),
            ));
        }
    }
    let row = radial_segments + 1;
    for i in 0..radial_segments {
        let top = base + i;
        let bottom = base + row + i;
        data.indices.extend_from_slice(&[
            top,
            bottom,
            top + 1,
            bottom,
            bottom + 1,
            top + 1,
        ]);
    }
}

fn push_cylinder_cap(data: &mut MeshData, radius: f32, y: f32, radial_segments: u32, top: bool) {
    let normal = if top {
        Vector3::unit_y()
    } else {
        -Vector3::unit_y()
    };
    let center = data.vertices.len() as u32;
    data.vertices
        .push(vertex(Vector3::new(0.0, y, 0.0), [0.5, 0.5], normal));
    for i in 0..=radial_segments {
        let theta = i as f32 / radial_segments as f32 * std::f32::consts::TAU;
        let (sin, cos) = theta.sin_cos();
        data.vertices.push(vertex(
            Vector3::new(radius * sin, y, radius * cos),
            [(sin + 1.0) / 2.0, (cos + 1.0) / 2.0],
            normal,
        ));
    }
    for i in 1..=radial_segments {
        let (a, b) = (center + i, center + i + 1);
        if top {
            data.indices.extend_from_slice(&[center, a, b]);
        } else {
            data.indices.extend_from_slice(&[center, b, a]);
        }
    }
}
