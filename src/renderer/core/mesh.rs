//! GPU-resident meshes.

use wgpu::util::DeviceExt;

use crate::resources::mesh::{MeshData, Vertex};

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

/// Full `{position, normal, uv}` layout used by the geometry pass.
#[must_use]
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Position-only view of the same buffer, used by the skybox.
#[must_use]
pub fn position_only_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES[..1],
    }
}

/// A vertex buffer and the number of vertices to draw from it.
pub struct GpuMesh {
    pub name: String,
    /// `None` for an empty mesh.
    pub buffer: Option<wgpu::Buffer>,
    pub vertex_count: u32,
}

impl GpuMesh {
    #[must_use]
    pub fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let buffer = (!mesh.vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&mesh.name),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        Self {
            name: mesh.name.clone(),
            buffer,
            vertex_count: mesh.vertex_count(),
        }
    }

    /// Binds the buffer and draws every vertex. Empty meshes issue nothing.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(buffer) = &self.buffer {
            pass.set_vertex_buffer(0, buffer.slice(..));
            pass.draw(0..self.vertex_count, 0..1);
        }
    }

    pub fn destroy(&self) {
        if let Some(buffer) = &self.buffer {
            buffer.destroy();
        }
    }
}
