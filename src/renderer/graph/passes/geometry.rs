//! Geometry Pass
//!
//! Rasterizes the selected mesh into the G-buffer: world-space position in
//! the first attachment, world-space normal in the second. Both are cleared
//! to zero so `position.w == 0` marks background pixels.

use crate::errors::Result;
use crate::renderer::core::mesh::vertex_layout;
use crate::renderer::core::targets::GBUFFER_FORMAT;
use crate::renderer::graph::context::ExecuteContext;
use crate::renderer::graph::frame_graph::{GEOMETRY_PASS, PassDesc};
use crate::renderer::graph::node::RenderNode;
use crate::renderer::pipeline::builder::{PipelineSpec, color_target, expect_frame_binding, render_pipeline};
use crate::renderer::pipeline::{ShaderDefines, ShaderManager};

pub struct GeometryPass {
    pipeline: wgpu::RenderPipeline,
}

impl GeometryPass {
    pub fn new(device: &wgpu::Device, shaders: &mut ShaderManager, frame_layout: &wgpu::BindGroupLayout) -> Result<Self> {
        let program = shaders.load_program(device, "geometry", &ShaderDefines::new())?;
        expect_frame_binding(&program)?;

        let pipeline = render_pipeline(
            device,
            &PipelineSpec {
                label: "Geometry Pipeline",
                program: &program,
                layouts: &[frame_layout],
                vertex_entry: "vs_main",
                vertex_buffers: &[vertex_layout()],
                targets: &[color_target(GBUFFER_FORMAT), color_target(GBUFFER_FORMAT)],
                depth: GEOMETRY_PASS.depth,
                cull_mode: Some(wgpu::Face::Back),
            },
        );

        Ok(Self { pipeline })
    }
}

impl RenderNode for GeometryPass {
    fn desc(&self) -> &'static PassDesc {
        &GEOMETRY_PASS
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let gbuffer = &ctx.resources.gbuffer;
        let clear = wgpu::Operations {
            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
            store: wgpu::StoreOp::Store,
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Geometry Pass"),
            color_attachments: &[
                Some(wgpu::RenderPassColorAttachment {
                    view: &gbuffer.position.view,
                    resolve_target: None,
                    ops: clear,
                    depth_slice: None,
                }),
                Some(wgpu::RenderPassColorAttachment {
                    view: &gbuffer.normal.view,
                    resolve_target: None,
                    ops: clear,
                    depth_slice: None,
                }),
            ],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &gbuffer.depth.view,
                depth_ops: GEOMETRY_PASS.depth.depth_ops(),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, ctx.frame_bind_group, &[]);
        // Zero-vertex meshes draw nothing; the cleared G-buffer reads as background
        ctx.mesh.draw(&mut pass);
    }
}
