//! Contexts handed to render nodes.

use crate::renderer::SsaoState;
use crate::renderer::core::{GpuMesh, ResourceSet};
use crate::scene::FrameState;

/// Mutable access for per-frame uploads before any command is recorded.
pub struct PrepareContext<'a> {
    pub queue: &'a wgpu::Queue,
    pub frame: &'a FrameState,
    pub ssao: &'a SsaoState,
}

/// Read-only view of everything a node records commands against.
pub struct ExecuteContext<'a> {
    pub resources: &'a ResourceSet,
    pub frame: &'a FrameState,
    /// Group 0 of every pipeline.
    pub frame_bind_group: &'a wgpu::BindGroup,
    /// Currently selected mesh.
    pub mesh: &'a GpuMesh,
    pub skybox_mesh: &'a GpuMesh,
    /// Surface texture view, or the headless present target.
    pub display: &'a wgpu::TextureView,
    pub clear_color: wgpu::Color,
}
