//! Skybox Pass
//!
//! Clears the composite target and draws the environment cube around the
//! camera. The geometry pass depth buffer is loaded and tested with
//! `LessEqual` but never written, so the sky only lands on background
//! pixels (`xyww` pushes every sky fragment to the far plane).

use crate::errors::Result;
use crate::renderer::core::mesh::position_only_layout;
use crate::renderer::core::targets::COMPOSITE_FORMAT;
use crate::renderer::core::GpuCubemap;
use crate::renderer::graph::context::ExecuteContext;
use crate::renderer::graph::frame_graph::{PassDesc, SKYBOX_PASS};
use crate::renderer::graph::node::RenderNode;
use crate::renderer::pipeline::builder::{
    BindingKind, PASS_GROUP, PipelineSpec, color_target, expect_frame_binding, group_layout, render_pipeline,
};
use crate::renderer::pipeline::{ShaderDefines, ShaderManager};

pub struct SkyboxPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
}

impl SkyboxPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderManager,
        frame_layout: &wgpu::BindGroupLayout,
        cubemap: &GpuCubemap,
    ) -> Result<Self> {
        let program = shaders.load_program(device, "skybox", &ShaderDefines::new())?;
        expect_frame_binding(&program)?;

        let inputs = group_layout(
            device,
            &program,
            PASS_GROUP,
            "Skybox Layout",
            &[("t_sky", BindingKind::TextureCube), ("s_sky", BindingKind::Sampler)],
        )?;

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Inputs"),
            layout: &inputs.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[0],
                    resource: wgpu::BindingResource::TextureView(&cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[1],
                    resource: wgpu::BindingResource::Sampler(&cubemap.sampler),
                },
            ],
        });

        let pipeline = render_pipeline(
            device,
            &PipelineSpec {
                label: "Skybox Pipeline",
                program: &program,
                layouts: &[frame_layout, &inputs.layout],
                vertex_entry: "vs_main",
                vertex_buffers: &[position_only_layout()],
                targets: &[color_target(COMPOSITE_FORMAT)],
                depth: SKYBOX_PASS.depth,
                // Viewed from inside the cube
                cull_mode: None,
            },
        );

        Ok(Self { pipeline, bind_group })
    }

}

impl RenderNode for SkyboxPass {
    fn desc(&self) -> &'static PassDesc {
        &SKYBOX_PASS
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let resources = ctx.resources;

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Skybox Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &resources.composite.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(ctx.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &resources.gbuffer.depth.view,
                depth_ops: SKYBOX_PASS.depth.depth_ops(),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, ctx.frame_bind_group, &[]);
        pass.set_bind_group(1, &self.bind_group, &[]);
        ctx.skybox_mesh.draw(&mut pass);
    }
}
