//! SSAO Blur Pass
//!
//! 4×4 box filter over the raw occlusion, the size of the noise tile, so the
//! per-pixel kernel rotation averages out.

use crate::errors::Result;
use crate::renderer::core::ResourceSet;
use crate::renderer::core::targets::SSAO_FORMAT;
use crate::renderer::graph::context::ExecuteContext;
use crate::renderer::graph::frame_graph::{PassDesc, SSAO_BLUR_PASS};
use crate::renderer::graph::node::RenderNode;
use crate::renderer::pipeline::builder::{
    BindingKind, PASS_GROUP, PipelineSpec, color_target, expect_frame_binding, group_layout, render_pipeline,
};
use crate::renderer::pipeline::{ShaderDefines, ShaderManager};

pub struct SsaoBlurPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl SsaoBlurPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderManager,
        frame_layout: &wgpu::BindGroupLayout,
        resources: &ResourceSet,
    ) -> Result<Self> {
        let program = shaders.load_program(device, "ssao_blur", &ShaderDefines::new())?;
        expect_frame_binding(&program)?;

        let inputs = group_layout(
            device,
            &program,
            PASS_GROUP,
            "SSAO Blur Layout",
            &[("t_occlusion", BindingKind::Texture2d)],
        )?;

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SSAO Blur Inputs"),
            layout: &inputs.layout,
            entries: &[wgpu::BindGroupEntry {
                binding: inputs.bindings[0],
                resource: wgpu::BindingResource::TextureView(&resources.ssao_raw.view),
            }],
        });

        let pipeline = render_pipeline(
            device,
            &PipelineSpec {
                label: "SSAO Blur Pipeline",
                program: &program,
                layouts: &[frame_layout, &inputs.layout],
                vertex_entry: "vs_fullscreen",
                vertex_buffers: &[],
                targets: &[color_target(SSAO_FORMAT)],
                depth: SSAO_BLUR_PASS.depth,
                cull_mode: None,
            },
        );

        Ok(Self { pipeline, bind_group })
    }
}

impl RenderNode for SsaoBlurPass {
    fn desc(&self) -> &'static PassDesc {
        &SSAO_BLUR_PASS
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let resources = ctx.resources;

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("SSAO Blur Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &resources.ssao_blurred.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &resources.aux_depth.view,
                depth_ops: SSAO_BLUR_PASS.depth.depth_ops(),
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
