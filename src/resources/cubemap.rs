//! Cubemap images on the CPU side.
//!
//! Faces are stored in wgpu layer order (+X, -X, +Y, -Y, +Z, -Z), which is
//! the order of [`CUBE_FACE_NAMES`].

use std::path::Path;

use image::RgbaImage;

use crate::errors::{Result, UmbraError};

/// File stems for the six faces, in layer order.
pub const CUBE_FACE_NAMES: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

/// Six square RGBA8 faces of equal size.
#[derive(Debug, Clone)]
pub struct CubemapImage {
    pub name: String,
    pub size: u32,
    pub faces: [RgbaImage; 6],
}

impl CubemapImage {
    /// Loads `root/name/{right,left,top,bottom,front,back}.extension`.
    pub fn load_named(root: impl AsRef<Path>, name: &str, extension: &str) -> Result<Self> {
        let dir = root.as_ref().join(name);
        let mut faces = Vec::with_capacity(6);
        for face in CUBE_FACE_NAMES {
            let path = dir.join(format!("{face}.{extension}"));
            if !path.exists() {
                return Err(UmbraError::AssetNotFound(path.display().to_string()));
            }
            faces.push(image::open(&path)?.to_rgba8());
        }
        log::info!("Loaded cubemap '{name}' from {}", dir.display());
        Self::from_faces(name, faces)
    }

    /// Validates and wraps six decoded faces.
    pub fn from_faces(name: &str, faces: Vec<RgbaImage>) -> Result<Self> {
        let faces: [RgbaImage; 6] = faces.try_into().map_err(|v: Vec<RgbaImage>| {
            UmbraError::CubeMapError(format!("'{name}' needs 6 faces, got {}", v.len()))
        })?;

        let (w, h) = faces[0].dimensions();
        if w != h || w == 0 {
            return Err(UmbraError::CubeMapError(format!(
                "'{name}' faces must be square, got {w}x{h}"
            )));
        }
        for (face, img) in CUBE_FACE_NAMES.iter().zip(&faces) {
            if img.dimensions() != (w, h) {
                let (fw, fh) = img.dimensions();
                return Err(UmbraError::CubeMapError(format!(
                    "'{name}' face '{face}' is {fw}x{fh}, expected {w}x{h}"
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            size: w,
            faces,
        })
    }

    /// A cubemap where every texel is `rgba`.
    #[must_use]
    pub fn solid(size: u32, rgba: [u8; 4]) -> Self {
        let size = size.max(1);
        let face = RgbaImage::from_pixel(size, size, image::Rgba(rgba));
        Self {
            name: "solid".to_string(),
            size,
            faces: std::array::from_fn(|_| face.clone()),
        }
    }
}
