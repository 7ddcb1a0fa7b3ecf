//! Scene lights on the GPU.
//!
//! The cell's lights never change, so they are packed into one uniform at
//! startup: the summed ambient term plus up to [`MAX_POINT_LIGHTS`] point lights.

use wgpu::util::DeviceExt;

use crate::data_structures::light::{Light, LightKind};

pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Linear colour premultiplied by intensity, w unused.
    ambient: [f32; 4],
    count: u32,
    // Uniforms require 16 byte (4 float) spacing
    _padding: [u32; 3],
    /// xyz position, w range.
    position_range: [[f32; 4]; MAX_POINT_LIGHTS],
    /// rgb colour, a intensity.
    color_intensity: [[f32; 4]; MAX_POINT_LIGHTS],
}

impl LightUniform {
    pub fn from_lights<'a>(lights: impl IntoIterator<Item = &'a Light>) -> Self {
        let mut uniform: Self = bytemuck::Zeroable::zeroed();
        for light in lights {
            match light.kind {
                LightKind::Ambient => {
                    for c in 0..3 {
                        uniform.ambient[c] += light.color[c] * light.intensity;
                    }
                }
                LightKind::Point => {
                    let i = uniform.count as usize;
                    if i == MAX_POINT_LIGHTS {
                        log::warn!(
                            "only {} point lights are supported, ignoring the light at {:?}",
                            MAX_POINT_LIGHTS,
                            light.position
                        );
                        continue;
                    }
                    let p = light.position;
                    uniform.position_range[i] = [p.x, p.y, p.z, light.range];
                    let [r, g, b] = light.color;
                    uniform.color_intensity[i] = [r, g, b, light.intensity];
                    uniform.count += 1;
                }
            }
        }
        uniform
    }

    pub fn ambient(&self) -> [f32; 3] {
        [self.ambient[0], self.ambient[1], self.ambient[2]]
    }

    pub fn point_count(&self) -> usize {
        self.count as usize
    }

    /// Position, range, colour and intensity of point light `i`.
    pub fn point(&self, i: usize) -> Option<([f32; 4], [f32; 4])> {
        (i < self.point_count()).then(|| (self.position_range[i], self.color_intensity[i]))
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Replaces the uploaded lights, e.g. once the scene has been assembled.
    pub fn write(&mut self, queue: &wgpu::Queue, uniform: LightUniform) {
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
