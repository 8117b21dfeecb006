//! Frame Graph
//!
//! The pass chain as data. Each [`PassDesc`] names what a pass samples,
//! what attachments it loads and what it writes, so the ordering rules can
//! be checked up front by [`FrameGraph::validate`] and per frame by
//! [`ResourceLedger`].
//!
//! ```text
//!  Mesh ──► Geometry ──► GBuffer{Position,Normal,Depth}
//!                          │         │           │
//!   Noise, Kernel ──► SSAO ◄─────────┘           │
//!                      │                         │
//!                      ▼                         │
//!                    Blur ──► SsaoBlurred        │
//!                                 │              ▼
//!   Cubemap ────────────────────► │ ◄──────── Skybox ──► Composite
//!                                 ▼                         │
//!                             Lighting ◄────────(load)──────┘
//!                                 │
//!                                 ▼
//!                              Present ──► Display
//! ```

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::{Result, UmbraError};

/// Every pass input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    // Uploaded once or per frame by the CPU
    MeshGeometry,
    SkyboxGeometry,
    FrameUniforms,
    SampleKernel,
    NoiseTile,
    Cubemap,

    // Produced by passes every frame
    GBufferPosition,
    GBufferNormal,
    GBufferDepth,
    AuxDepth,
    SsaoRaw,
    SsaoBlurred,
    Composite,
    Display,
}

impl Resource {
    /// External resources are not produced by any pass, so the
    /// same-frame rule does not apply to them.
    #[inline]
    #[must_use]
    pub fn is_external(self) -> bool {
        matches!(
            self,
            Self::MeshGeometry
                | Self::SkyboxGeometry
                | Self::FrameUniforms
                | Self::SampleKernel
                | Self::NoiseTile
                | Self::Cubemap
        )
    }
}

/// How a pass uses its depth attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    /// Cleared, tested with `Less`, written.
    TestWrite,
    /// Loaded, tested with `LessEqual`, never written.
    TestOnly,
    /// No depth attachment.
    Disabled,
}

impl DepthMode {
    #[must_use]
    pub fn depth_stencil_state(self, format: wgpu::TextureFormat) -> Option<wgpu::DepthStencilState> {
        let (depth_write_enabled, depth_compare) = match self {
            Self::TestWrite => (true, wgpu::CompareFunction::Less),
            Self::TestOnly => (false, wgpu::CompareFunction::LessEqual),
            Self::Disabled => return None,
        };
        Some(wgpu::DepthStencilState {
            format,
            depth_write_enabled: Some(depth_write_enabled),
            depth_compare: Some(depth_compare),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        })
    }

    /// Load op for the depth attachment, `None` when disabled.
    #[must_use]
    pub fn depth_ops(self) -> Option<wgpu::Operations<f32>> {
        match self {
            Self::TestWrite => Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            Self::TestOnly => Some(wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            }),
            Self::Disabled => None,
        }
    }
}

/// Static description of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassDesc {
    pub label: &'static str,
    /// Bound as textures, buffers or uniforms.
    pub reads: &'static [Resource],
    /// Attachments whose previous contents are kept (`LoadOp::Load`).
    pub loads: &'static [Resource],
    pub writes: &'static [Resource],
    pub depth: DepthMode,
}

pub const GEOMETRY_PASS: PassDesc = PassDesc {
    label: "Geometry",
    reads: &[Resource::MeshGeometry, Resource::FrameUniforms],
    loads: &[],
    writes: &[Resource::GBufferPosition, Resource::GBufferNormal, Resource::GBufferDepth],
    depth: DepthMode::TestWrite,
};

pub const SSAO_PASS: PassDesc = PassDesc {
    label: "SSAO",
    reads: &[
        Resource::GBufferPosition,
        Resource::GBufferNormal,
        Resource::NoiseTile,
        Resource::SampleKernel,
        Resource::FrameUniforms,
    ],
    loads: &[],
    writes: &[Resource::SsaoRaw, Resource::AuxDepth],
    depth: DepthMode::TestWrite,
};

pub const SSAO_BLUR_PASS: PassDesc = PassDesc {
    label: "SSAO Blur",
    reads: &[Resource::SsaoRaw, Resource::FrameUniforms],
    loads: &[],
    writes: &[Resource::SsaoBlurred, Resource::AuxDepth],
    depth: DepthMode::TestWrite,
};

pub const SKYBOX_PASS: PassDesc = PassDesc {
    label: "Skybox",
    reads: &[Resource::SkyboxGeometry, Resource::Cubemap, Resource::FrameUniforms],
    loads: &[Resource::GBufferDepth],
    writes: &[Resource::Composite],
    depth: DepthMode::TestOnly,
};

pub const LIGHTING_PASS: PassDesc = PassDesc {
    label: "Lighting",
    reads: &[
        Resource::GBufferPosition,
        Resource::GBufferNormal,
        Resource::SsaoBlurred,
        Resource::Cubemap,
        Resource::FrameUniforms,
    ],
    loads: &[Resource::Composite],
    writes: &[Resource::Composite],
    depth: DepthMode::Disabled,
};

pub const PRESENT_PASS: PassDesc = PassDesc {
    label: "Present",
    reads: &[
        Resource::Composite,
        Resource::GBufferPosition,
        Resource::GBufferNormal,
        Resource::SsaoRaw,
        Resource::SsaoBlurred,
    ],
    loads: &[],
    writes: &[Resource::Display],
    depth: DepthMode::Disabled,
};

// ============================================================================
// FrameGraph
// ============================================================================

/// An ordered list of pass descriptions.
#[derive(Debug, Clone, Default)]
pub struct FrameGraph {
    passes: Vec<PassDesc>,
}

impl FrameGraph {
    #[must_use]
    pub fn new(passes: Vec<PassDesc>) -> Self {
        Self { passes }
    }

    /// Geometry → SSAO → Blur → Skybox → Lighting → Present.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            GEOMETRY_PASS,
            SSAO_PASS,
            SSAO_BLUR_PASS,
            SKYBOX_PASS,
            LIGHTING_PASS,
            PRESENT_PASS,
        ])
    }

    #[must_use]
    pub fn passes(&self) -> &[PassDesc] {
        &self.passes
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.label).collect()
    }

    /// Checks that no pass samples what it writes and that every transient
    /// input is produced by an earlier pass.
    pub fn validate(&self) -> Result<()> {
        let mut produced: SmallVec<[Resource; 16]> = SmallVec::new();

        for pass in &self.passes {
            for &r in pass.reads {
                if pass.writes.contains(&r) {
                    return Err(ordering_error(pass, r, "self-feedback"));
                }
            }
            for &r in pass.reads.iter().chain(pass.loads) {
                if !r.is_external() && !produced.contains(&r) {
                    return Err(ordering_error(pass, r, "not produced by an earlier pass"));
                }
            }
            for &w in pass.writes {
                if w.is_external() {
                    return Err(ordering_error(pass, w, "external resources are read-only"));
                }
                if !produced.contains(&w) {
                    produced.push(w);
                }
            }
        }
        Ok(())
    }
}

fn ordering_error(pass: &PassDesc, resource: Resource, why: &str) -> UmbraError {
    UmbraError::GraphOrdering {
        pass: pass.label.to_string(),
        resource: format!("{resource:?} ({why})"),
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// Tracks which frame last wrote each transient resource.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    frame: u64,
    stamps: FxHashMap<Resource, u64>,
}

impl ResourceLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self, frame_index: u64) {
        self.frame = frame_index;
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frame index of the last write to `resource`.
    #[must_use]
    pub fn stamp(&self, resource: Resource) -> Option<u64> {
        self.stamps.get(&resource).copied()
    }

    /// Fails if any transient input of `pass` was not written this frame.
    pub fn check_inputs(&self, pass: &PassDesc) -> Result<()> {
        for &r in pass.reads.iter().chain(pass.loads) {
            if r.is_external() {
                continue;
            }
            let stamp = self.stamp(r);
            if stamp != Some(self.frame) {
                log::error!(
                    "Pass '{}' reads {r:?} stamped {stamp:?} during frame {}",
                    pass.label,
                    self.frame
                );
                return Err(ordering_error(pass, r, "stale input"));
            }
        }
        Ok(())
    }

    pub fn record_outputs(&mut self, pass: &PassDesc) {
        for &w in pass.writes {
            self.stamps.insert(w, self.frame);
        }
    }
}

/// What ran during one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame_index: u64,
    pub passes: SmallVec<[&'static str; 8]>,
}
