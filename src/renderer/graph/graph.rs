//! Render Graph Executor
//!
//! Runs nodes strictly in insertion order inside one command encoder and
//! submits once per frame. Before each node records, the ledger confirms
//! that its inputs were written earlier in the same frame.

use smallvec::SmallVec;

use super::context::{ExecuteContext, PrepareContext};
use super::frame_graph::{FrameGraph, FrameReport, ResourceLedger};
use super::node::RenderNode;
use crate::errors::Result;

pub struct RenderGraph {
    nodes: Vec<Box<dyn RenderNode>>,
    ledger: ResourceLedger,
}

impl Default for RenderGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            ledger: ResourceLedger::new(),
        }
    }

    /// Nodes run in the order they are added.
    #[inline]
    pub fn add_node(&mut self, node: Box<dyn RenderNode>) {
        self.nodes.push(node);
    }

    /// The pass descriptions of the current node list.
    #[must_use]
    pub fn frame_graph(&self) -> FrameGraph {
        FrameGraph::new(self.nodes.iter().map(|n| *n.desc()).collect())
    }

    /// Validates the node order; call once after building.
    pub fn validate(&self) -> Result<()> {
        self.frame_graph().validate()
    }

    pub fn prepare(&mut self, ctx: &mut PrepareContext) {
        for node in &mut self.nodes {
            node.prepare(ctx);
        }
    }

    /// Records every node and submits.
    ///
    /// A ledger failure abandons the encoder, so nothing from that frame
    /// reaches the GPU.
    pub fn execute(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, ctx: &ExecuteContext) -> Result<FrameReport> {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Graph Encoder"),
        });

        self.ledger.begin_frame(ctx.frame.frame_index);
        let mut passes = SmallVec::new();

        for node in &self.nodes {
            let desc = node.desc();
            self.ledger.check_inputs(desc)?;

            encoder.push_debug_group(node.name());
            node.run(ctx, &mut encoder);
            encoder.pop_debug_group();

            self.ledger.record_outputs(desc);
            passes.push(node.name());
        }

        queue.submit(std::iter::once(encoder.finish()));

        log::trace!("Frame {} ran {} passes", ctx.frame.frame_index, passes.len());

        Ok(FrameReport {
            frame_index: ctx.frame.frame_index,
            passes,
        })
    }

    #[must_use]
    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
