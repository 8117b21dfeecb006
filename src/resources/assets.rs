//! Scene asset loading.
//!
//! Reads the whole mesh catalog and the skybox cubemap up front. Any missing
//! file aborts start-up with the offending path.

use crate::config::SceneConfig;
use crate::errors::{Result, UmbraError};
use crate::resources::cubemap::CubemapImage;
use crate::resources::mesh::MeshData;

/// CPU-side data the renderer uploads once at start-up.
#[derive(Debug, Clone)]
pub struct SceneAssets {
    /// Mesh catalog, in selector order.
    pub meshes: Vec<MeshData>,
    pub cubemap: CubemapImage,
}

impl SceneAssets {
    pub fn new(meshes: Vec<MeshData>, cubemap: CubemapImage) -> Result<Self> {
        if meshes.is_empty() {
            return Err(UmbraError::EmptyMeshCatalog);
        }
        Ok(Self { meshes, cubemap })
    }

    /// Loads every catalog mesh and the configured skybox from disk.
    pub fn load(scene: &SceneConfig) -> Result<Self> {
        let mut meshes = Vec::with_capacity(scene.meshes.len());
        for (index, path) in scene.mesh_paths().into_iter().enumerate() {
            let mesh = MeshData::load_obj(&path)?;
            log::info!("Loaded mesh {index}: {} ({} vertices)", path.display(), mesh.vertex_count());
            meshes.push(mesh);
        }

        let cubemap = CubemapImage::load_named(&scene.cubemap_root, &scene.skybox, &scene.skybox_extension)?;
        log::info!("Loaded cubemap '{}' ({}px faces)", cubemap.name, cubemap.size);

        Self::new(meshes, cubemap)
    }

    #[inline]
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_is_rejected() {
        let result = SceneAssets::new(Vec::new(), CubemapImage::solid(1, [0, 0, 0, 255]));
        assert!(matches!(result, Err(UmbraError::EmptyMeshCatalog)));
    }

    #[test]
    fn missing_mesh_names_the_path() {
        let scene = SceneConfig {
            mesh_root: "does/not/exist".into(),
            meshes: vec!["nothing.obj".to_string()],
            ..SceneConfig::default()
        };
        match SceneAssets::load(&scene) {
            Err(UmbraError::AssetNotFound(path)) => assert!(path.contains("nothing.obj")),
            other => panic!("expected AssetNotFound, got {other:?}"),
        }
    }
}
