//! Screen Space Ambient Occlusion (SSAO) Pass
//!
//! ```text
//!  GBuffer Position ──┐
//!  GBuffer Normal  ───┼──► SSAO ──► R8Unorm (noisy) ──► SsaoBlurPass
//!  Noise 4x4, Kernel ─┘
//! ```
//!
//! Positions and normals are world-space in the G-buffer and moved into view
//! space in the shader. The kernel is rotated per pixel by the noise tile.
//! Background pixels write 1.0 (unoccluded).

use wgpu::util::DeviceExt;

use crate::errors::Result;
use crate::renderer::SsaoState;
use crate::renderer::core::ResourceSet;
use crate::renderer::core::targets::SSAO_FORMAT;
use crate::renderer::graph::context::{ExecuteContext, PrepareContext};
use crate::renderer::graph::frame_graph::{PassDesc, SSAO_PASS};
use crate::renderer::graph::node::RenderNode;
use crate::renderer::pipeline::builder::{
    BindingKind, PASS_GROUP, PipelineSpec, color_target, expect_frame_binding, group_layout, render_pipeline,
};
use crate::renderer::pipeline::{ShaderDefines, ShaderManager};

pub struct SsaoPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniforms: wgpu::Buffer,
    uploaded_version: u64,
    /// Noise scale follows the targets, not the surface.
    target_size: (u32, u32),
}

impl SsaoPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderManager,
        frame_layout: &wgpu::BindGroupLayout,
        resources: &ResourceSet,
        ssao: &SsaoState,
    ) -> Result<Self> {
        let program = shaders.load_program(device, "ssao", &ShaderDefines::new())?;
        expect_frame_binding(&program)?;

        let inputs = group_layout(
            device,
            &program,
            PASS_GROUP,
            "SSAO Inputs Layout",
            &[
                ("t_position", BindingKind::Texture2d),
                ("t_normal", BindingKind::Texture2d),
                ("t_noise", BindingKind::Texture2d),
                ("ssao", BindingKind::Uniform),
            ],
        )?;

        let (width, height) = resources.size();
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("SSAO Uniforms"),
            contents: bytemuck::bytes_of(&ssao.uniforms(width, height)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SSAO Inputs"),
            layout: &inputs.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[0],
                    resource: wgpu::BindingResource::TextureView(&resources.gbuffer.position.view),
                },
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[1],
                    resource: wgpu::BindingResource::TextureView(&resources.gbuffer.normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[2],
                    resource: wgpu::BindingResource::TextureView(&resources.noise_view),
                },
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[3],
                    resource: uniforms.as_entire_binding(),
                },
            ],
        });

        let pipeline = render_pipeline(
            device,
            &PipelineSpec {
                label: "SSAO Pipeline",
                program: &program,
                layouts: &[frame_layout, &inputs.layout],
                vertex_entry: "vs_fullscreen",
                vertex_buffers: &[],
                targets: &[color_target(SSAO_FORMAT)],
                depth: SSAO_PASS.depth,
                cull_mode: None,
            },
        );

        Ok(Self {
            pipeline,
            bind_group,
            uniforms,
            uploaded_version: ssao.version(),
            target_size: (width, height),
        })
    }
}

impl RenderNode for SsaoPass {
    fn desc(&self) -> &'static PassDesc {
        &SSAO_PASS
    }

    fn prepare(&mut self, ctx: &mut PrepareContext) {
        if ctx.ssao.version() == self.uploaded_version {
            return;
        }
        let (width, height) = self.target_size;
        let uniforms = ctx.ssao.uniforms(width, height);
        ctx.queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));
        self.uploaded_version = ctx.ssao.version();
        log::debug!("SSAO uniforms updated (version {})", self.uploaded_version);
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let resources = ctx.resources;

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("SSAO Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &resources.ssao_raw.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &resources.aux_depth.view,
                depth_ops: SSAO_PASS.depth.depth_ops(),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, ctx.frame_bind_group, &[]);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.draw(0..3, 0..1); // fullscreen triangle
    }
}
