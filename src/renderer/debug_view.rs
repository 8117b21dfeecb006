//! Debug View Selector
//!
//! Routes one of the five live render targets to the display.

use crate::renderer::graph::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DebugView {
    /// Final shaded image.
    #[default]
    Composite,
    /// World-space G-buffer position.
    Position,
    /// World-space G-buffer normal.
    Normal,
    /// Occlusion straight out of the SSAO pass.
    RawSsao,
    /// Occlusion after the blur pass.
    BlurredSsao,
}

impl DebugView {
    pub const ALL: [DebugView; 5] = [
        Self::Composite,
        Self::Position,
        Self::Normal,
        Self::RawSsao,
        Self::BlurredSsao,
    ];

    /// Maps a selector value `0..=4`; anything else yields `None`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The render target this view displays.
    #[must_use]
    pub fn source(self) -> Resource {
        match self {
            Self::Composite => Resource::Composite,
            Self::Position => Resource::GBufferPosition,
            Self::Normal => Resource::GBufferNormal,
            Self::RawSsao => Resource::SsaoRaw,
            Self::BlurredSsao => Resource::SsaoBlurred,
        }
    }

    /// Single-channel targets are splatted to gray on display.
    #[inline]
    #[must_use]
    pub fn is_single_channel(self) -> bool {
        matches!(self, Self::RawSsao | Self::BlurredSsao)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Composite => "composite",
            Self::Position => "position",
            Self::Normal => "normal",
            Self::RawSsao => "ssao",
            Self::BlurredSsao => "ssao blurred",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_round_trip() {
        for (i, view) in DebugView::ALL.iter().enumerate() {
            assert_eq!(DebugView::from_index(i), Some(*view));
            assert_eq!(view.index(), i);
        }
        assert_eq!(DebugView::from_index(5), None);
    }

    #[test]
    fn every_view_has_a_distinct_source() {
        let sources: rustc_hash::FxHashSet<_> = DebugView::ALL.iter().map(|v| v.source()).collect();
        assert_eq!(sources.len(), 5);
    }
}
