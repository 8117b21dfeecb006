//! SSAO (Screen Space Ambient Occlusion) Data
//!
//! Pure data for the occlusion passes:
//!
//! - [`SampleKernel`]: hemisphere offsets, generated once at startup.
//! - [`NoiseTile`]: a 4×4 grid of rotation vectors tiled across the screen.
//! - [`SsaoSettings`]: radius, bias and intensity from the config file.
//! - [`SsaoUniforms`]: the GPU layout of all of the above.
//!
//! # Algorithm
//!
//! 1. Each kernel sample is a random direction in the +Z hemisphere, pushed
//!    inwards by a random length and then by a quadratic ease-in over its
//!    index, so early samples cluster near the origin.
//! 2. The noise tile rotates the kernel per pixel around the surface normal.
//!    Sixteen distinct rotations are enough to break banding once the blur
//!    pass averages a 4×4 neighbourhood.
//! 3. The shader range-checks each sample against the G-buffer position and
//!    raises the result to `intensity`.

use glam::{Vec2, Vec3, Vec4};
use half::f16;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde::Deserialize;

/// Upper bound on kernel samples; the uniform array has this many slots.
pub const MAX_KERNEL_SIZE: usize = 64;

/// Noise tile edge length in texels.
pub const NOISE_TILE_SIZE: u32 = 4;

const KERNEL_MIN_SCALE: f32 = 0.1;
const KERNEL_MAX_SCALE: f32 = 1.0;

// ============================================================================
// Sample Kernel
// ============================================================================

/// Ordered hemisphere sample offsets, immutable once generated.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleKernel {
    samples: Vec<Vec3>,
}

impl SampleKernel {
    /// Generates `count` samples from a generator seeded with `seed`.
    #[must_use]
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate_with(count, &mut rng)
    }

    /// Generates `count` samples drawing from `rng`.
    #[must_use]
    pub fn generate_with(count: usize, rng: &mut StdRng) -> Self {
        let mut samples = Vec::with_capacity(count);

        for i in 0..count {
            // Random direction in the upper hemisphere (Z >= 0)
            let mut sample = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(0.0..1.0),
            )
            .normalize_or_zero();

            // Random magnitude within the hemisphere volume
            sample *= rng.random_range(0.0..1.0f32);

            // Quadratic ease-in: concentrate samples near the origin
            let t = i as f32 / count as f32;
            sample *= lerp(KERNEL_MIN_SCALE, KERNEL_MAX_SCALE, t * t);

            samples.push(sample);
        }

        Self { samples }
    }

    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Packs the samples into the fixed-size uniform array, zero-filling
    /// unused slots. Samples past [`MAX_KERNEL_SIZE`] are dropped.
    #[must_use]
    pub fn to_uniform_array(&self) -> [Vec4; MAX_KERNEL_SIZE] {
        let mut out = [Vec4::ZERO; MAX_KERNEL_SIZE];
        for (slot, s) in out.iter_mut().zip(&self.samples) {
            *slot = s.extend(0.0);
        }
        out
    }
}

// ============================================================================
// Noise Tile
// ============================================================================

/// 4×4 grid of random rotation vectors in the XY plane (Z = 0).
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseTile {
    texels: [Vec3; 16],
}

impl NoiseTile {
    #[must_use]
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut texels = [Vec3::ZERO; 16];
        for texel in &mut texels {
            *texel = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                0.0,
            )
            .normalize_or_zero();
        }
        Self { texels }
    }

    #[inline]
    #[must_use]
    pub fn texels(&self) -> &[Vec3; 16] {
        &self.texels
    }

    /// Encodes the tile as `Rgba16Float` texel data, row-major.
    #[must_use]
    pub fn to_rgba16f_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(16 * 8);
        for t in &self.texels {
            for c in [t.x, t.y, t.z, 1.0] {
                bytes.extend_from_slice(&f16::from_f32(c).to_le_bytes());
            }
        }
        bytes
    }
}

// ============================================================================
// Settings & GPU Uniforms
// ============================================================================

/// Occlusion parameters read from the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SsaoSettings {
    /// Number of kernel samples, clamped to `1..=64`.
    pub kernel_size: u32,
    /// Sampling radius in view-space units.
    pub radius: f32,
    /// Depth bias against self-occlusion.
    pub bias: f32,
    /// Exponent applied to the final occlusion value.
    pub intensity: f32,
    /// Seed for kernel generation. The noise tile uses `seed + 1`.
    pub seed: u64,
}

impl Default for SsaoSettings {
    fn default() -> Self {
        Self {
            kernel_size: MAX_KERNEL_SIZE as u32,
            radius: 0.5,
            bias: 0.025,
            intensity: 1.0,
            seed: 42,
        }
    }
}

impl SsaoSettings {
    /// Kernel size clamped into the range the uniform array can hold.
    #[inline]
    #[must_use]
    pub fn clamped_kernel_size(&self) -> u32 {
        self.kernel_size.clamp(1, MAX_KERNEL_SIZE as u32)
    }

    /// Builds the uniform block for a kernel and a target size.
    #[must_use]
    pub fn uniforms(&self, kernel: &SampleKernel, width: u32, height: u32) -> SsaoUniforms {
        let tile = NOISE_TILE_SIZE as f32;
        SsaoUniforms {
            samples: kernel.to_uniform_array(),
            radius: self.radius.max(0.01),
            bias: self.bias.max(0.0),
            intensity: self.intensity.max(0.0),
            sample_count: kernel.len().min(MAX_KERNEL_SIZE) as u32,
            noise_scale: Vec2::new(width as f32 / tile, height as f32 / tile),
            _pad: [0; 2],
        }
    }
}

/// GPU layout matching `SsaoUniforms` in `ssao.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SsaoUniforms {
    pub samples: [Vec4; MAX_KERNEL_SIZE],
    pub radius: f32,
    pub bias: f32,
    pub intensity: f32,
    pub sample_count: u32,
    pub noise_scale: Vec2,
    pub _pad: [u32; 2],
}

fn lerp(a: f32, b: f32, f: f32) -> f32 {
    a + f * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_kernel() {
        assert_eq!(SampleKernel::generate(64, 7), SampleKernel::generate(64, 7));
    }

    #[test]
    fn uniform_array_zero_fills_tail() {
        let kernel = SampleKernel::generate(8, 1);
        let packed = kernel.to_uniform_array();
        assert_eq!(packed[8], Vec4::ZERO);
        assert_eq!(packed[63], Vec4::ZERO);
        assert_eq!(packed[0].truncate(), kernel.samples()[0]);
    }

    #[test]
    fn uniforms_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<SsaoUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<SsaoUniforms>(), 64 * 16 + 32);
    }

    #[test]
    fn noise_scale_tiles_the_target() {
        let settings = SsaoSettings::default();
        let kernel = SampleKernel::generate(4, 0);
        let u = settings.uniforms(&kernel, 800, 600);
        assert_eq!(u.noise_scale, Vec2::new(200.0, 150.0));
        assert_eq!(u.sample_count, 4);
    }

    #[test]
    fn kernel_size_is_clamped() {
        let mut s = SsaoSettings::default();
        s.kernel_size = 0;
        assert_eq!(s.clamped_kernel_size(), 1);
        s.kernel_size = 500;
        assert_eq!(s.clamped_kernel_size(), 64);
    }
}
