//! Render graph: pass descriptions, the per-frame ledger, and the passes.

pub mod context;
pub mod frame_graph;
pub mod graph;
pub mod node;
pub mod passes;

pub use context::{ExecuteContext, PrepareContext};
pub use frame_graph::{DepthMode, FrameGraph, FrameReport, PassDesc, Resource, ResourceLedger};
pub use graph::RenderGraph;
pub use node::RenderNode;
