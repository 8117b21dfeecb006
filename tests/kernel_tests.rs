//! Sample Kernel & Noise Tile Integration Tests
//!
//! Tests for:
//! - Kernel size, hemisphere bound and magnitude ceiling
//! - Quadratic distance scaling (top vs bottom quartile)
//! - Noise tile shape and GPU packing

use rand::SeedableRng;
use rand::rngs::StdRng;
use umbra::resources::ssao::{MAX_KERNEL_SIZE, NOISE_TILE_SIZE, NoiseTile, SampleKernel, SsaoSettings};

const EPSILON: f32 = 1e-5;

fn quartile_means(kernel: &SampleKernel) -> (f32, f32) {
    let samples = kernel.samples();
    let q = samples.len() / 4;
    let mean = |s: &[glam::Vec3]| s.iter().map(|v| v.length()).sum::<f32>() / s.len() as f32;
    (mean(&samples[..q]), mean(&samples[samples.len() - q..]))
}

// ============================================================================
// Kernel Shape
// ============================================================================

#[test]
fn kernel_has_requested_count() {
    for count in [1, 8, 16, 32, MAX_KERNEL_SIZE] {
        assert_eq!(SampleKernel::generate(count, 7).len(), count);
    }
}

#[test]
fn kernel_samples_lie_in_upper_unit_hemisphere() {
    for seed in 0..16 {
        let kernel = SampleKernel::generate(MAX_KERNEL_SIZE, seed);
        for (i, s) in kernel.samples().iter().enumerate() {
            assert!(s.length() <= 1.0 + EPSILON, "seed {seed} sample {i} too long: {s}");
            assert!(s.z >= 0.0, "seed {seed} sample {i} below the surface: {s}");
        }
    }
}

#[test]
fn kernel_top_quartile_reaches_further_than_bottom() {
    for seed in 0..32 {
        let kernel = SampleKernel::generate(MAX_KERNEL_SIZE, seed);
        let (bottom, top) = quartile_means(&kernel);
        assert!(top > bottom, "seed {seed}: bottom {bottom} >= top {top}");
    }
}

#[test]
fn kernel_from_shared_rng_differs_between_draws() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = SampleKernel::generate_with(MAX_KERNEL_SIZE, &mut rng);
    let b = SampleKernel::generate_with(MAX_KERNEL_SIZE, &mut rng);
    assert_ne!(a, b);
}

#[test]
fn kernel_uniform_array_keeps_order() {
    let kernel = SampleKernel::generate(4, 11);
    let packed = kernel.to_uniform_array();
    for (slot, s) in packed.iter().zip(kernel.samples()) {
        assert_eq!(slot.truncate(), *s);
        assert!(slot.w.abs() < EPSILON);
    }
}

// ============================================================================
// Noise Tile
// ============================================================================

#[test]
fn noise_tile_is_planar() {
    let tile = NoiseTile::generate(5);
    assert_eq!(tile.texels().len(), (NOISE_TILE_SIZE * NOISE_TILE_SIZE) as usize);
    for t in tile.texels() {
        assert!(t.z.abs() < EPSILON);
        assert!((-1.0..=1.0).contains(&t.x));
        assert!((-1.0..=1.0).contains(&t.y));
    }
}

#[test]
fn noise_tile_packs_as_rgba16f() {
    let tile = NoiseTile::generate(5);
    let bytes = tile.to_rgba16f_bytes();
    assert_eq!(bytes.len(), (NOISE_TILE_SIZE * NOISE_TILE_SIZE * 8) as usize);

    let first = half::f16::from_le_bytes([bytes[0], bytes[1]]).to_f32();
    assert!((first - tile.texels()[0].x).abs() < 1e-3);
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn default_settings_use_full_kernel() {
    let settings = SsaoSettings::default();
    let kernel = SampleKernel::generate(settings.clamped_kernel_size() as usize, settings.seed);
    let uniforms = settings.uniforms(&kernel, 800, 600);

    assert_eq!(uniforms.sample_count, MAX_KERNEL_SIZE as u32);
    assert!((uniforms.noise_scale.x - 200.0).abs() < EPSILON);
    assert!((uniforms.noise_scale.y - 150.0).abs() < EPSILON);
}
