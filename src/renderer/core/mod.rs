//! GPU-side resources: context, render targets, meshes, cubemap, readback.

pub mod context;
pub mod cubemap;
pub mod mesh;
pub mod readback;
pub mod targets;

pub use context::GpuContext;
pub use cubemap::GpuCubemap;
pub use mesh::GpuMesh;
pub use readback::TextureReadback;
pub use targets::{GBuffer, RenderTarget, ResourceSet};
