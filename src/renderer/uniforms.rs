//! Per-frame uniforms (group 0, binding 0 of every program).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec4};
use wgpu::util::DeviceExt;

use crate::scene::FrameState;

/// GPU layout matching `FrameUniforms` in `chunks/frame.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub camera_position: Vec4,
    pub light_direction: Vec4,
    pub light_colour: Vec4,
    pub object_colour: Vec4,
    pub ambient: Vec4,
    pub screen_size: Vec2,
    /// Non-zero: lighting treats occlusion as 1.0
    pub ao_bypass: u32,
    pub _pad: u32,
}

impl From<&FrameState> for FrameUniforms {
    fn from(frame: &FrameState) -> Self {
        Self {
            model: frame.model,
            view: frame.view,
            projection: frame.projection,
            view_projection: frame.view_projection,
            camera_position: frame.camera_position.extend(1.0),
            light_direction: frame.light_direction.normalize_or_zero().extend(0.0),
            light_colour: frame.light_colour.extend(1.0),
            object_colour: frame.object_colour.extend(1.0),
            ambient: frame.ambient.extend(1.0),
            screen_size: frame.viewport.as_vec2(),
            ao_bypass: u32::from(frame.ao_bypass),
            _pad: 0,
        }
    }
}

/// The frame uniform buffer with its layout and bind group.
pub struct FrameBindings {
    pub layout: wgpu::BindGroupLayout,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl FrameBindings {
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame BindGroup Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(size_of::<FrameUniforms>() as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BindGroup"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { layout, buffer, bind_group }
    }

    #[inline]
    pub fn write(&self, queue: &wgpu::Queue, uniforms: &FrameUniforms) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniforms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_wgsl_struct_size() {
        // 4 mat4 + 5 vec4 + vec2 + 2 u32
        assert_eq!(size_of::<FrameUniforms>(), 352);
        assert_eq!(size_of::<FrameUniforms>() % 16, 0);
    }
}
