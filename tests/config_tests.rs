//! Configuration Integration Tests
//!
//! Tests for:
//! - Defaults (window, scene catalog, SSAO)
//! - JSON overrides and partial documents
//! - Validation: empty catalog, default mesh wrap, kernel clamp

use umbra::UmbraError;
use umbra::config::AppConfig;
use umbra::renderer::PowerMode;

const EPSILON: f32 = 1e-6;

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn defaults_match_demo_setup() {
    let config = AppConfig::default();

    assert_eq!((config.window.width, config.window.height), (800, 600));
    assert_eq!(config.scene.meshes.len(), 6);
    assert_eq!(config.scene.default_mesh, 3);
    assert_eq!(config.scene.skybox, "above_the_sea");
    assert_eq!(config.ssao.kernel_size, 64);
    assert!((config.scene.fov_degrees - 75.0).abs() < EPSILON);
}

#[test]
fn default_mesh_paths_join_root() {
    let config = AppConfig::default();
    let paths = config.scene.mesh_paths();
    assert_eq!(paths[3], std::path::Path::new("res/models").join("bunny.obj"));
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn empty_document_gives_defaults() {
    let config = AppConfig::from_json("{}").unwrap();
    assert_eq!(config, {
        let mut d = AppConfig::default();
        d.validate().unwrap();
        d
    });
}

#[test]
fn partial_document_overrides_fields() {
    let config = AppConfig::from_json(
        r#"{
            "window": { "title": "test" },
            "render": { "vsync": false, "power_preference": "low_power" },
            "scene": { "default_mesh": 1, "fov_degrees": 60.0 },
            "ssao": { "radius": 0.8 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.window.title, "test");
    assert_eq!(config.window.width, 800);
    assert!(!config.render.vsync);
    assert_eq!(config.render.power_preference, PowerMode::LowPower);
    assert_eq!(config.scene.default_mesh, 1);
    assert!((config.scene.fov_degrees - 60.0).abs() < EPSILON);
    assert!((config.ssao.radius - 0.8).abs() < EPSILON);
    assert!((config.ssao.bias - 0.025).abs() < EPSILON);
}

#[test]
fn malformed_document_is_a_config_error() {
    let err = AppConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, UmbraError::ConfigError(_)));
}

#[test]
fn load_reads_file_from_disk() {
    let path = std::env::temp_dir().join(format!("umbra-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "scene": { "skybox": "night" } }"#).unwrap();

    let config = AppConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.scene.skybox, "night");
}

#[test]
fn load_missing_file_is_io_error() {
    let err = AppConfig::load("does/not/exist.json").unwrap_err();
    assert!(matches!(err, UmbraError::IoError(_)));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn empty_catalog_is_rejected() {
    let err = AppConfig::from_json(r#"{ "scene": { "meshes": [] } }"#).unwrap_err();
    assert!(matches!(err, UmbraError::EmptyMeshCatalog));
}

#[test]
fn default_mesh_wraps_into_catalog() {
    let config = AppConfig::from_json(r#"{ "scene": { "default_mesh": 8 } }"#).unwrap();
    assert_eq!(config.scene.default_mesh, 2);
}

#[test]
fn kernel_size_is_clamped() {
    let config = AppConfig::from_json(r#"{ "ssao": { "kernel_size": 500 } }"#).unwrap();
    assert_eq!(config.ssao.kernel_size, 64);

    let config = AppConfig::from_json(r#"{ "ssao": { "kernel_size": 0 } }"#).unwrap();
    assert_eq!(config.ssao.kernel_size, 1);
}
