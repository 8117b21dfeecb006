//! CPU-side resources: input state, sample kernel and noise, mesh and
//! cubemap data. Nothing in here touches the GPU.

pub mod assets;
pub mod cubemap;
pub mod input;
pub mod mesh;
pub mod ssao;

pub use assets::SceneAssets;
pub use cubemap::{CUBE_FACE_NAMES, CubemapImage};
pub use input::{ButtonState, Input, Key, MouseButton};
pub use mesh::{MeshData, Vertex};
pub use ssao::{NoiseTile, SampleKernel, SsaoSettings};
