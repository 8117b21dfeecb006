//! Application Configuration
//!
//! Everything tunable lives in [`AppConfig`], loaded once at startup from an
//! optional JSON file. Every field has a default, so a partial file only
//! overrides what it names:
//!
//! ```json
//! {
//!     "window": { "title": "umbra" },
//!     "scene": { "default_mesh": 0, "skybox": "night" },
//!     "ssao": { "radius": 0.8 }
//! }
//! ```
//!
//! Nothing is ever written back.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::errors::{Result, UmbraError};
use crate::renderer::settings::RenderSettings;
use crate::resources::ssao::SsaoSettings;

/// Environment variable naming a config file when no argument is given.
pub const CONFIG_ENV_VAR: &str = "UMBRA_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub render: RenderSettings,
    pub scene: SceneConfig,
    pub ssao: SsaoSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Umbra - G-buffer + SSAO".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Mesh catalog, skybox, camera start pose and lighting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub mesh_root: PathBuf,
    pub meshes: Vec<String>,
    pub default_mesh: usize,

    pub cubemap_root: PathBuf,
    pub skybox: String,
    pub skybox_extension: String,

    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    pub camera_position: [f32; 3],
    /// Horizontal aim angle in radians; `-π/2` looks down -Z.
    pub camera_angle: f32,
    pub move_speed: f32,
    pub mouse_sensitivity: f32,

    pub object_colour: [f32; 3],
    pub light_colour: [f32; 3],
    pub light_direction: [f32; 3],
    pub ambient: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        let light_direction = Vec3::new(-0.55, -0.55, -0.63).normalize();
        Self {
            mesh_root: PathBuf::from("res/models"),
            meshes: [
                "monkey-adv.obj",
                "monkey-subdiv.obj",
                "suzanne.obj",
                "bunny.obj",
                "armadillo.obj",
                "dragon.obj",
            ]
            .map(String::from)
            .to_vec(),
            default_mesh: 3,
            cubemap_root: PathBuf::from("res/cubemaps"),
            skybox: "above_the_sea".to_string(),
            skybox_extension: "jpg".to_string(),
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            camera_position: [0.0, 1.0, 6.5],
            camera_angle: -std::f32::consts::FRAC_PI_2,
            move_speed: 2.4,
            mouse_sensitivity: 1.0,
            object_colour: [0.8, 0.4, 0.0],
            light_colour: [1.0, 1.0, 1.0],
            light_direction: light_direction.to_array(),
            ambient: [0.3, 0.3, 0.3],
        }
    }
}

impl SceneConfig {
    /// Full paths of the catalog entries, in order.
    #[must_use]
    pub fn mesh_paths(&self) -> Vec<PathBuf> {
        self.meshes.iter().map(|m| self.mesh_root.join(m)).collect()
    }
}

impl AppConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Parses and validates a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves the config from the first CLI argument, then
    /// [`CONFIG_ENV_VAR`], then defaults.
    pub fn from_env() -> Result<Self> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok());
        match path {
            Some(path) => {
                log::info!("Loading config from {path}");
                Self::load(path)
            }
            None => {
                let mut config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Rejects an empty mesh catalog, wraps `default_mesh` into range and
    /// clamps the kernel size.
    pub fn validate(&mut self) -> Result<()> {
        if self.scene.meshes.is_empty() {
            return Err(UmbraError::EmptyMeshCatalog);
        }
        let count = self.scene.meshes.len();
        if self.scene.default_mesh >= count {
            log::warn!(
                "default_mesh {} out of range for {count} meshes, wrapping",
                self.scene.default_mesh
            );
            self.scene.default_mesh %= count;
        }
        self.ssao.kernel_size = self.ssao.clamped_kernel_size();
        self.window.width = self.window.width.max(1);
        self.window.height = self.window.height.max(1);
        Ok(())
    }
}
