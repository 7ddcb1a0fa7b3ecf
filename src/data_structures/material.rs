//! Shading parameters of a mesh.
//!
//! A [`Material`] is immutable once built and is shared between meshes through
//! `Rc`. Its texture is only a [`TextureHandle`]; whether the image behind it has
//! arrived yet is the renderer's concern, not the material's.

use crate::resources::texture::TextureHandle;

/// Converts an sRGB hex colour such as `0x00b3b3` into linear RGB.
pub fn color_from_hex(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub texture: Option<TextureHandle>,
    /// Linear RGB, multiplied with the texture.
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub transparent: bool,
}

impl Material {
    pub fn new() -> Self {
        Self {
            texture: None,
            color: [1.0, 1.0, 1.0],
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            transparent: false,
        }
    }

    pub fn with_texture(mut self, texture: &TextureHandle) -> Self {
        self.texture = Some(texture.clone());
        self
    }

    pub fn with_color(mut self, hex: u32) -> Self {
        self.color = color_from_hex(hex);
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    /// Blends with what is behind it at the given opacity.
    pub fn transparent(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            color: [self.color[0], self.color[1], self.color[2], self.opacity],
            roughness: self.roughness,
            metalness: self.metalness,
            _padding: [0.0; 2],
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    color: [f32; 4],
    roughness: f32,
    metalness: f32,
    // Uniforms are laid out in 16 byte steps
    _padding: [f32; 2],
}

/// Texture, sampler and [`MaterialUniform`], in that binding order.
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}
