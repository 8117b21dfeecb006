//! Layout and pipeline helpers shared by the passes.
//!
//! Bind group layouts are built from the binding numbers a program's source
//! declares, looked up by variable name. A name the shader does not declare
//! (or declares in a different group) fails at init.

use smallvec::SmallVec;

use super::shader_manager::{BindingSlot, ShaderProgram};
use crate::errors::{Result, UmbraError};
use crate::renderer::graph::DepthMode;
use crate::renderer::core::targets::DEPTH_FORMAT;

/// Bind group that carries `FrameUniforms` in every program.
pub const FRAME_GROUP: u32 = 0;
/// Bind group for pass-specific inputs.
pub const PASS_GROUP: u32 = 1;

/// Shape of one resource binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `texture_2d<f32>` read with `textureLoad`.
    Texture2d,
    /// `texture_cube<f32>` sampled with filtering.
    TextureCube,
    /// Filtering sampler.
    Sampler,
    /// `var<uniform>` buffer.
    Uniform,
}

impl BindingKind {
    fn ty(self) -> wgpu::BindingType {
        match self {
            Self::Texture2d => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            Self::TextureCube => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::Cube,
                multisampled: false,
            },
            Self::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            Self::Uniform => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
        }
    }
}

/// A layout plus the binding number of each requested name, in request order.
pub struct GroupLayout {
    pub layout: wgpu::BindGroupLayout,
    pub bindings: SmallVec<[u32; 8]>,
}

/// Resolves `name` in `program` and checks it lives in `group`.
pub fn resolve(program: &ShaderProgram, group: u32, name: &str) -> Result<BindingSlot> {
    let slot = program.binding(name)?;
    if slot.group != group {
        return Err(UmbraError::MissingBinding {
            technique: program.name.clone(),
            binding: format!("{name} (expected group {group}, found {})", slot.group),
        });
    }
    Ok(slot)
}

/// Builds the layout for `group` from named entries.
pub fn group_layout(
    device: &wgpu::Device,
    program: &ShaderProgram,
    group: u32,
    label: &str,
    entries: &[(&str, BindingKind)],
) -> Result<GroupLayout> {
    let mut bindings = SmallVec::new();
    let mut layout_entries: SmallVec<[wgpu::BindGroupLayoutEntry; 8]> = SmallVec::new();

    for &(name, kind) in entries {
        let slot = resolve(program, group, name)?;
        bindings.push(slot.binding);
        layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding: slot.binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: kind.ty(),
            count: None,
        });
    }

    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &layout_entries,
    });

    Ok(GroupLayout { layout, bindings })
}

/// Fails unless the program declares `frame` at group 0, binding 0.
pub fn expect_frame_binding(program: &ShaderProgram) -> Result<()> {
    let slot = resolve(program, FRAME_GROUP, "frame")?;
    if slot.binding != 0 {
        return Err(UmbraError::MissingBinding {
            technique: program.name.clone(),
            binding: format!("frame (expected binding 0, found {})", slot.binding),
        });
    }
    Ok(())
}

/// Everything that varies between the passes' render pipelines.
pub struct PipelineSpec<'a> {
    pub label: &'a str,
    pub program: &'a ShaderProgram,
    pub layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_entry: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub targets: &'a [Option<wgpu::ColorTargetState>],
    pub depth: DepthMode,
    pub cull_mode: Option<wgpu::Face>,
}

pub fn render_pipeline(device: &wgpu::Device, spec: &PipelineSpec) -> wgpu::RenderPipeline {
    let groups: SmallVec<[Option<&wgpu::BindGroupLayout>; 4]> = spec.layouts.iter().copied().map(Some).collect();
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Layout", spec.label)),
        bind_group_layouts: &groups,
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &spec.program.module,
            entry_point: Some(spec.vertex_entry),
            buffers: spec.vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &spec.program.module,
            entry_point: Some("fs_main"),
            targets: spec.targets,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: spec.cull_mode,
            ..Default::default()
        },
        depth_stencil: spec.depth.depth_stencil_state(DEPTH_FORMAT),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Opaque colour target with no blending.
#[inline]
#[must_use]
pub fn color_target(format: wgpu::TextureFormat) -> Option<wgpu::ColorTargetState> {
    Some(wgpu::ColorTargetState {
        format,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })
}
