//! Live SSAO parameters and the kernel generated from them.
//!
//! The kernel is built once from the initial settings and never replaced.
//! Only radius, bias and intensity can change afterwards.

use crate::resources::ssao::{SampleKernel, SsaoSettings, SsaoUniforms};

/// Settings plus the kernel they produced. `version` increments on every
/// change so the SSAO pass re-uploads only when something moved.
#[derive(Debug, Clone)]
pub struct SsaoState {
    settings: SsaoSettings,
    kernel: SampleKernel,
    version: u64,
}

impl SsaoState {
    #[must_use]
    pub fn new(settings: SsaoSettings) -> Self {
        let kernel = SampleKernel::generate(settings.clamped_kernel_size() as usize, settings.seed);
        Self {
            settings,
            kernel,
            version: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &SsaoSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn kernel(&self) -> &SampleKernel {
        &self.kernel
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Applies radius, bias and intensity from `settings`.
    ///
    /// Kernel size and seed are fixed at creation; differing values are
    /// logged and ignored. Returns whether anything changed.
    pub fn update(&mut self, settings: SsaoSettings) -> bool {
        if settings.clamped_kernel_size() != self.settings.clamped_kernel_size() || settings.seed != self.settings.seed {
            log::warn!(
                "SSAO kernel is fixed for the session (size {}, seed {}); ignoring size {} and seed {}",
                self.settings.clamped_kernel_size(),
                self.settings.seed,
                settings.clamped_kernel_size(),
                settings.seed
            );
        }

        let live = SsaoSettings {
            kernel_size: self.settings.kernel_size,
            seed: self.settings.seed,
            ..settings
        };
        if live == self.settings {
            return false;
        }
        self.settings = live;
        self.version += 1;
        true
    }

    #[must_use]
    pub fn uniforms(&self, width: u32, height: u32) -> SsaoUniforms {
        self.settings.uniforms(&self.kernel, width, height)
    }
}
