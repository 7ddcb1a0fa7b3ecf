use crate::data_structures::material::color_from_hex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    /// Lights every surface evenly, regardless of position.
    Ambient,
    Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    /// Linear RGB.
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance at which a point light fades out completely. Zero means no cutoff.
    pub range: f32,
    pub position: cgmath::Point3<f32>,
    pub cast_shadow: bool,
}

impl Light {
    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color: color_from_hex(hex),
            intensity,
            range: 0.0,
            position: cgmath::Point3::new(0.0, 0.0, 0.0),
            cast_shadow: false,
        }
    }

    pub fn point(hex: u32, intensity: f32, range: f32) -> Self {
        Self {
            kind: LightKind::Point,
            range,
            ..Self::ambient(hex, intensity)
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = cgmath::Point3::new(x, y, z);
        self
    }

    pub fn casts_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }
}
