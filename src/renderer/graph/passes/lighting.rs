//! Lighting / Composite Pass
//!
//! Shades every geometry pixel of the G-buffer with the active technique and
//! blends nothing: background pixels are discarded so the sky drawn by
//! [`SkyboxPass`](super::SkyboxPass) survives in the loaded composite.
//!
//! Occlusion is sampled from the blurred SSAO target unless the frame's
//! bypass flag is set, in which case it is treated as 1.0.

use crate::errors::{Result, UmbraError};
use crate::renderer::core::targets::COMPOSITE_FORMAT;
use crate::renderer::core::{GpuCubemap, ResourceSet};
use crate::renderer::graph::context::ExecuteContext;
use crate::renderer::graph::frame_graph::{LIGHTING_PASS, PassDesc};
use crate::renderer::graph::node::RenderNode;
use crate::renderer::pipeline::builder::{
    BindingKind, PASS_GROUP, PipelineSpec, color_target, expect_frame_binding, group_layout, render_pipeline, resolve,
};
use crate::renderer::pipeline::{ShaderManager, TechniqueRegistry};
use crate::scene::Technique;

const INPUTS: [(&str, BindingKind); 5] = [
    ("t_position", BindingKind::Texture2d),
    ("t_normal", BindingKind::Texture2d),
    ("t_occlusion", BindingKind::Texture2d),
    ("t_sky", BindingKind::TextureCube),
    ("s_sky", BindingKind::Sampler),
];

pub struct LightingPass {
    techniques: TechniqueRegistry,
    bind_group: wgpu::BindGroup,
}

impl LightingPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderManager,
        frame_layout: &wgpu::BindGroupLayout,
        resources: &ResourceSet,
        cubemap: &GpuCubemap,
    ) -> Result<Self> {
        // Every technique shares one input layout, built from the base program.
        let base = shaders.load_program(device, "lighting", &TechniqueRegistry::defines(Technique::Phong))?;
        let inputs = group_layout(device, &base, PASS_GROUP, "Lighting Inputs Layout", &INPUTS)?;

        let techniques = TechniqueRegistry::build(device, shaders, "lighting", |technique, program| {
            expect_frame_binding(program)?;
            for (&(name, _), &binding) in INPUTS.iter().zip(&inputs.bindings) {
                if resolve(program, PASS_GROUP, name)?.binding != binding {
                    return Err(UmbraError::MissingBinding {
                        technique: program.name.clone(),
                        binding: name.to_string(),
                    });
                }
            }

            let label = format!("Lighting Pipeline ({})", technique.name());
            Ok(render_pipeline(
                device,
                &PipelineSpec {
                    label: &label,
                    program,
                    layouts: &[frame_layout, &inputs.layout],
                    vertex_entry: "vs_fullscreen",
                    vertex_buffers: &[],
                    targets: &[color_target(COMPOSITE_FORMAT)],
                    depth: LIGHTING_PASS.depth,
                    cull_mode: None,
                },
            ))
        })?;

        let gbuffer = &resources.gbuffer;
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lighting Inputs"),
            layout: &inputs.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[0],
                    resource: wgpu::BindingResource::TextureView(&gbuffer.position.view),
                },
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[1],
                    resource: wgpu::BindingResource::TextureView(&gbuffer.normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[2],
                    resource: wgpu::BindingResource::TextureView(&resources.ssao_blurred.view),
                },
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[3],
                    resource: wgpu::BindingResource::TextureView(&cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: inputs.bindings[4],
                    resource: wgpu::BindingResource::Sampler(&cubemap.sampler),
                },
            ],
        });

        Ok(Self { techniques, bind_group })
    }

    #[must_use]
    pub fn technique_count(&self) -> usize {
        self.techniques.len()
    }
}

impl RenderNode for LightingPass {
    fn desc(&self) -> &'static PassDesc {
        &LIGHTING_PASS
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let Some(record) = self.techniques.get(ctx.frame.technique) else {
            log::error!("No pipeline for technique '{}'", ctx.frame.technique.name());
            return;
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Lighting Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &ctx.resources.composite.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });

        pass.set_pipeline(&record.pipeline);
        pass.set_bind_group(0, ctx.frame_bind_group, &[]);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
