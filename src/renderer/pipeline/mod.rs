//! Shader loading, pipeline construction and the technique registry.

pub mod builder;
pub mod shader_manager;
pub mod technique;

pub use builder::{BindingKind, GroupLayout, PipelineSpec};
pub use shader_manager::{BindingSlot, ShaderDefines, ShaderManager, ShaderProgram};
pub use technique::{TechniqueRecord, TechniqueRegistry};
