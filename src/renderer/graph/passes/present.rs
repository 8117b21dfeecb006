//! Present Pass
//!
//! Copies the target picked by the frame's [`DebugView`] onto the display.
//! One bind group per view is built up front; single-channel SSAO targets
//! are splatted to gray.

use bytemuck::{Pod, Zeroable};
use smallvec::SmallVec;
use wgpu::util::DeviceExt;

use crate::errors::{Result, UmbraError};
use crate::renderer::DebugView;
use crate::renderer::core::ResourceSet;
use crate::renderer::graph::context::ExecuteContext;
use crate::renderer::graph::frame_graph::{PRESENT_PASS, PassDesc};
use crate::renderer::graph::node::RenderNode;
use crate::renderer::pipeline::builder::{BindingKind, PASS_GROUP, PipelineSpec, color_target, group_layout, render_pipeline};
use crate::renderer::pipeline::{ShaderDefines, ShaderManager};

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct PresentParams {
    channel_mode: u32,
    _pad: [u32; 3],
}

struct ViewBinding {
    bind_group: wgpu::BindGroup,
    _params: wgpu::Buffer,
}

pub struct PresentPass {
    pipeline: wgpu::RenderPipeline,
    views: SmallVec<[ViewBinding; 5]>,
}

impl PresentPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderManager,
        frame_layout: &wgpu::BindGroupLayout,
        resources: &ResourceSet,
        display_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let program = shaders.load_program(device, "present", &ShaderDefines::new())?;
        let inputs = group_layout(
            device,
            &program,
            PASS_GROUP,
            "Present Layout",
            &[("t_source", BindingKind::Texture2d), ("params", BindingKind::Uniform)],
        )?;

        let mut views = SmallVec::new();
        for view in DebugView::ALL {
            let source = resources.target(view.source()).ok_or_else(|| UmbraError::GraphOrdering {
                pass: PRESENT_PASS.label.to_string(),
                resource: view.label().to_string(),
            })?;

            let params = PresentParams {
                channel_mode: u32::from(view.is_single_channel()),
                _pad: [0; 3],
            };
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Present Params"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(view.label()),
                layout: &inputs.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: inputs.bindings[0],
                        resource: wgpu::BindingResource::TextureView(&source.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: inputs.bindings[1],
                        resource: buffer.as_entire_binding(),
                    },
                ],
            });
            views.push(ViewBinding { bind_group, _params: buffer });
        }

        // Group 0 stays in the layout so the frame bind group can be set uniformly.
        let pipeline = render_pipeline(
            device,
            &PipelineSpec {
                label: "Present Pipeline",
                program: &program,
                layouts: &[frame_layout, &inputs.layout],
                vertex_entry: "vs_fullscreen",
                vertex_buffers: &[],
                targets: &[color_target(display_format)],
                depth: PRESENT_PASS.depth,
                cull_mode: None,
            },
        );

        Ok(Self { pipeline, views })
    }
}

impl RenderNode for PresentPass {
    fn desc(&self) -> &'static PassDesc {
        &PRESENT_PASS
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let Some(view) = self.views.get(ctx.frame.debug_view.index()) else {
            return;
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Present Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.display,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, ctx.frame_bind_group, &[]);
        pass.set_bind_group(1, &view.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
