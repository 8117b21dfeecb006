//! Render Node Trait
//!
//! Every pass implements [`RenderNode`].
//!
//! - `prepare` gets mutable access and uploads whatever changed this frame.
//! - `run` records commands only; it must not allocate GPU resources.

use super::context::{ExecuteContext, PrepareContext};
use super::frame_graph::PassDesc;

pub trait RenderNode {
    /// Inputs, outputs and depth usage of this pass.
    fn desc(&self) -> &'static PassDesc;

    /// Node name, used for debug groups and reports.
    fn name(&self) -> &'static str {
        self.desc().label
    }

    fn prepare(&mut self, _ctx: &mut PrepareContext) {}

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder);
}
