//! Headless Rendering Integration Tests
//!
//! Tests for:
//! - End-to-end 800×600 frame (composite and raw SSAO views)
//! - Same-frame G-buffer consumption
//! - Ambient occlusion bypass invariance and the fixed kernel
//! - Fixed target size across surface resizes
//! - Zero-vertex meshes, shutdown and use after shutdown
//!
//! Every test skips (and passes) when no GPU adapter is available.

use anyhow::{Context, Result};
use glam::{Mat4, UVec2, Vec3};
use umbra::config::AppConfig;
use umbra::renderer::graph::{FrameReport, Resource};
use umbra::renderer::{DebugView, Renderer};
use umbra::resources::ssao::SsaoSettings;
use umbra::resources::{CubemapImage, MeshData, SceneAssets, Vertex};
use umbra::scene::{FrameState, SessionState, Technique};
use umbra::UmbraError;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const SKY: [u8; 4] = [40, 80, 160, 255];
const TEST_SCENE_INDEX: usize = 3;
const EMPTY_MESH_INDEX: usize = 5;

/// A unit cube resting on a 6×6 floor, so contact creases occlude.
fn cube_on_floor() -> MeshData {
    let mut mesh = MeshData::cube(1.0);
    mesh.name = "cube-on-floor".to_string();

    let floor = |x: f32, z: f32| Vertex {
        position: [x, -1.0, z],
        normal: [0.0, 1.0, 0.0],
        uv: [0.0, 0.0],
    };
    mesh.vertices.extend([
        floor(-3.0, 3.0),
        floor(3.0, 3.0),
        floor(3.0, -3.0),
        floor(-3.0, 3.0),
        floor(3.0, -3.0),
        floor(-3.0, -3.0),
    ]);
    mesh
}

fn test_assets() -> SceneAssets {
    let meshes = vec![
        MeshData::cube(0.5),
        MeshData::cube(0.75),
        MeshData::cube(1.0),
        cube_on_floor(),
        MeshData::cube(1.25),
        MeshData::empty("empty"),
    ];
    SceneAssets::new(meshes, CubemapImage::solid(16, SKY)).unwrap()
}

fn headless(config: &AppConfig) -> Option<Renderer> {
    match Renderer::new_headless(WIDTH, HEIGHT, config, &test_assets()) {
        Ok(renderer) => Some(renderer),
        Err(UmbraError::AdapterRequestFailed(e)) => {
            eprintln!("skipping: no GPU adapter ({e})");
            None
        }
        Err(UmbraError::DeviceCreateFailed(e)) => {
            eprintln!("skipping: device creation failed ({e})");
            None
        }
        Err(e) => panic!("renderer init failed: {e}"),
    }
}

fn session(config: &AppConfig) -> SessionState {
    SessionState::new(config, UVec2::new(WIDTH, HEIGHT))
}

fn render(renderer: &mut Renderer, frame: &FrameState) -> Result<FrameReport> {
    let report = renderer
        .render(frame)?
        .context("headless frames are never skipped")?;
    assert_eq!(report.frame_index, frame.frame_index);
    Ok(report)
}

fn decode_rgba16f(texel: &[u8]) -> [f32; 4] {
    let c = |i: usize| half::f16::from_le_bytes([texel[2 * i], texel[2 * i + 1]]).to_f32();
    [c(0), c(1), c(2), c(3)]
}

// ============================================================================
// End-to-End
// ============================================================================

#[test]
fn end_to_end_composite_and_raw_ssao() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);

    let frame = state.frame();
    assert_eq!(frame.mesh_index, TEST_SCENE_INDEX);
    assert_eq!(frame.debug_view, DebugView::Composite);
    render(&mut renderer, &frame)?;

    let composite = renderer.read_presented()?;
    assert_eq!(composite.dimensions(), (WIDTH, HEIGHT));

    let corner = composite.get_pixel(0, 0).0;
    let centre = composite.get_pixel(WIDTH / 2, HEIGHT / 2).0;
    assert_ne!(corner, centre, "mesh silhouette should cover the centre");
    assert!(composite.pixels().any(|p| p.0 != corner));

    let mut frame = state.frame();
    frame.debug_view = DebugView::RawSsao;
    render(&mut renderer, &frame)?;

    let ssao = renderer.read_presented()?;
    assert_eq!(ssao.dimensions(), (WIDTH, HEIGHT));
    assert!(ssao.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]), "raw SSAO is grayscale");
    assert_ne!(ssao.as_raw(), composite.as_raw());

    renderer.shutdown();
    Ok(())
}

#[test]
fn every_debug_view_presents() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);

    for view in DebugView::ALL {
        let mut frame = state.frame();
        frame.debug_view = view;
        render(&mut renderer, &frame)?;
        assert_eq!(renderer.read_presented()?.dimensions(), (WIDTH, HEIGHT));
    }
    Ok(())
}

#[test]
fn both_techniques_render_all_passes() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);

    for technique in Technique::ALL {
        let mut frame = state.frame();
        frame.technique = technique;
        let report = render(&mut renderer, &frame)?;
        assert_eq!(
            report.passes.as_slice(),
            &["Geometry", "SSAO", "SSAO Blur", "Skybox", "Lighting", "Present"]
        );
    }
    Ok(())
}

// ============================================================================
// Pipeline Ordering
// ============================================================================

#[test]
fn gbuffer_reflects_the_current_frame() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);
    let (cx, cy) = (WIDTH / 2, HEIGHT / 2);

    // The centre ray (y = 1, heading -Z) hits the cube's front face.
    let mut frame = state.frame();
    frame.model = Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0));
    render(&mut renderer, &frame)?;

    let position = renderer.read_view(DebugView::Position)?;
    let [_, _, z, w] = decode_rgba16f(position.texel(cx, cy));
    assert!((w - 1.0).abs() < 1e-3);
    assert!((z - 1.0).abs() < 0.05, "front face at z = 1, got {z}");

    // Marker: push the mesh back by two units
    let mut frame = state.frame();
    frame.model = Mat4::from_translation(Vec3::new(0.0, 0.5, -2.0));
    render(&mut renderer, &frame)?;

    let position = renderer.read_view(DebugView::Position)?;
    let [_, _, z, _] = decode_rgba16f(position.texel(cx, cy));
    assert!((z + 1.0).abs() < 0.05, "front face moved to z = -1, got {z}");

    for resource in [Resource::GBufferPosition, Resource::SsaoRaw, Resource::SsaoBlurred, Resource::Composite] {
        assert_eq!(renderer.ledger().stamp(resource), Some(frame.frame_index));
    }
    Ok(())
}

#[test]
fn background_is_unoccluded() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);
    render(&mut renderer, &state.frame())?;

    let raw = renderer.read_view(DebugView::RawSsao)?;
    assert_eq!(raw.bytes_per_pixel, 1);
    assert_eq!(raw.texel(0, 0), &[255]);

    let position = renderer.read_view(DebugView::Position)?;
    assert!(decode_rgba16f(position.texel(0, 0))[3].abs() < 1e-3);
    Ok(())
}

// ============================================================================
// Ambient Occlusion
// ============================================================================

/// Renders one frame with `settings` and returns the presented image plus
/// the blurred occlusion bytes.
fn capture(
    renderer: &mut Renderer,
    state: &mut SessionState,
    settings: &SsaoSettings,
    bypass: bool,
) -> Result<(image::RgbaImage, Vec<u8>)> {
    renderer.set_ssao_settings(settings.clone());
    let mut frame = state.frame();
    frame.ao_bypass = bypass;
    render(renderer, &frame)?;
    Ok((
        renderer.read_presented()?,
        renderer.read_view(DebugView::BlurredSsao)?.bytes,
    ))
}

#[test]
fn bypass_ignores_blurred_occlusion() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);

    // Same kernel throughout; only radius and bias move the blurred buffer.
    let wide = SsaoSettings {
        radius: 1.0,
        bias: 0.0,
        ..SsaoSettings::default()
    };
    let tight = SsaoSettings {
        radius: 0.01,
        bias: 1.0,
        ..SsaoSettings::default()
    };

    let (bypass_wide, blur_wide) = capture(&mut renderer, &mut state, &wide, true)?;
    let (bypass_tight, blur_tight) = capture(&mut renderer, &mut state, &tight, true)?;
    assert_ne!(blur_wide, blur_tight, "blur buffer contents should differ");
    assert_eq!(bypass_wide.as_raw(), bypass_tight.as_raw());

    let (occluded, _) = capture(&mut renderer, &mut state, &wide, false)?;
    assert_ne!(occluded.as_raw(), bypass_wide.as_raw());
    Ok(())
}

#[test]
fn kernel_survives_settings_changes() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);
    let before = renderer.ssao().kernel().clone();

    let changed = renderer.set_ssao_settings(SsaoSettings {
        kernel_size: 8,
        seed: 7,
        radius: 0.75,
        ..SsaoSettings::default()
    });
    render(&mut renderer, &state.frame())?;

    assert!(changed);
    assert_eq!(renderer.ssao().kernel(), &before);
    assert_eq!(renderer.ssao().kernel().len(), 64);
    assert!((renderer.ssao().settings().radius - 0.75).abs() < f32::EPSILON);
    Ok(())
}

// ============================================================================
// Targets & Lifecycle
// ============================================================================

#[test]
fn target_size_is_fixed_for_the_session() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);

    assert_eq!(renderer.target_size(), (WIDTH, HEIGHT));
    renderer.resize_surface(1024, 768);
    render(&mut renderer, &state.frame())?;

    assert_eq!(renderer.target_size(), (WIDTH, HEIGHT));
    assert_eq!(renderer.read_presented()?.dimensions(), (WIDTH, HEIGHT));
    for view in DebugView::ALL {
        let readback = renderer.read_view(view)?;
        assert_eq!((readback.width, readback.height), (WIDTH, HEIGHT));
    }
    Ok(())
}

#[test]
fn occlusion_ignores_viewport_drift() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);
    let settings = SsaoSettings {
        radius: 0.4,
        ..config.ssao.clone()
    };

    renderer.set_ssao_settings(settings.clone());
    let baseline_frame = state.frame();
    render(&mut renderer, &baseline_frame)?;
    let baseline = renderer.read_view(DebugView::RawSsao)?.bytes;

    // A stale viewport must not change noise tiling or texel lookups.
    let mut drifted = baseline_frame;
    drifted.viewport = UVec2::new(WIDTH * 2, HEIGHT * 3);
    renderer.set_ssao_settings(SsaoSettings {
        radius: 0.5,
        ..settings.clone()
    });
    render(&mut renderer, &drifted)?;
    renderer.set_ssao_settings(settings);
    render(&mut renderer, &drifted)?;

    assert_eq!(renderer.read_view(DebugView::RawSsao)?.bytes, baseline);
    Ok(())
}

#[test]
fn empty_mesh_draws_nothing() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);

    let mut frame = state.frame();
    frame.mesh_index = EMPTY_MESH_INDEX;
    render(&mut renderer, &frame)?;

    let image = renderer.read_presented()?;
    let corner = image.get_pixel(0, 0).0;
    assert!(image.pixels().all(|p| p.0 == corner), "only sky should be visible");
    Ok(())
}

#[test]
fn shutdown_is_idempotent() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);
    render(&mut renderer, &state.frame())?;

    renderer.shutdown();
    renderer.shutdown();
    assert!(renderer.is_shut_down());
    Ok(())
}

#[test]
fn render_after_shutdown_is_skipped() -> Result<()> {
    let config = AppConfig::default();
    let Some(mut renderer) = headless(&config) else {
        return Ok(());
    };
    let mut state = session(&config);
    render(&mut renderer, &state.frame())?;

    renderer.shutdown();

    assert!(renderer.render(&state.frame())?.is_none());
    assert!(matches!(renderer.read_presented(), Err(UmbraError::ReadbackFailed(_))));
    assert!(matches!(
        renderer.read_view(DebugView::Composite),
        Err(UmbraError::ReadbackFailed(_))
    ));
    Ok(())
}
