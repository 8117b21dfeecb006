//! Renderer Configuration

use serde::Deserialize;

/// GPU adapter selection preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    /// Prefer a discrete GPU.
    #[default]
    HighPerformance,
    /// Prefer an integrated GPU.
    LowPower,
}

impl PowerMode {
    #[inline]
    #[must_use]
    pub fn to_wgpu(self) -> wgpu::PowerPreference {
        match self {
            Self::HighPerformance => wgpu::PowerPreference::HighPerformance,
            Self::LowPower => wgpu::PowerPreference::LowPower,
        }
    }
}

/// Global configuration for renderer initialization.
///
/// | Field              | Description                        | Default           |
/// |--------------------|------------------------------------|-------------------|
/// | `vsync`            | Vertical sync enabled              | `true`            |
/// | `power_preference` | GPU adapter selection strategy     | `HighPerformance` |
/// | `clear_color`      | Composite clear / sky fallback     | (0.1, 0.1, 0.1)   |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// When `true`, the frame rate is capped to the display refresh rate.
    pub vsync: bool,

    pub power_preference: PowerMode,

    /// Linear RGBA clear colour for the composite target.
    pub clear_color: [f64; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            power_preference: PowerMode::default(),
            clear_color: [0.1, 0.1, 0.1, 1.0],
        }
    }
}

impl RenderSettings {
    #[inline]
    #[must_use]
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }

    #[inline]
    #[must_use]
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}
