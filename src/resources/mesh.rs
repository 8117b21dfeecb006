//! Mesh data loading.
//!
//! Meshes are expanded into a flat, non-indexed triangle list so the
//! geometry pass can issue a single `draw(0..vertex_count)` per frame.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::{Vec2, Vec3};

use crate::errors::{Result, UmbraError};

/// Interleaved vertex consumed by the geometry pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// A non-indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex>,
}

impl MeshData {
    /// Loads an OBJ file. All objects in the file are merged.
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => UmbraError::AssetNotFound(path.display().to_string()),
            _ => UmbraError::IoError(e),
        })?;
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        let mut reader = BufReader::new(file);
        Self::from_obj_reader(&name, &mut reader).map_err(|e| match e {
            UmbraError::MeshLoadFailed { reason, .. } => UmbraError::MeshLoadFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parses OBJ text from any buffered reader. Material libraries are ignored.
    pub fn from_obj_reader<R: BufRead>(name: &str, reader: &mut R) -> Result<Self> {
        let (models, _materials) = tobj::load_obj_buf(
            reader,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
            |_| Err(tobj::LoadError::OpenFileFailed),
        )
        .map_err(|e| UmbraError::MeshLoadFailed {
            path: name.to_string(),
            reason: e.to_string(),
        })?;

        let mut vertices = Vec::new();
        for model in &models {
            let mesh = &model.mesh;
            let has_normals = !mesh.normals.is_empty();
            let has_uvs = !mesh.texcoords.is_empty();

            for face in mesh.indices.chunks_exact(3) {
                let corners = [face[0] as usize, face[1] as usize, face[2] as usize];
                let positions = corners.map(|i| Vec3::from_slice(&mesh.positions[i * 3..i * 3 + 3]));

                // Flat normal when the file carries none
                let face_normal = (positions[1] - positions[0])
                    .cross(positions[2] - positions[0])
                    .normalize_or_zero();

                for (k, &i) in corners.iter().enumerate() {
                    let normal = if has_normals {
                        Vec3::from_slice(&mesh.normals[i * 3..i * 3 + 3])
                    } else {
                        face_normal
                    };
                    let uv = if has_uvs {
                        Vec2::from_slice(&mesh.texcoords[i * 2..i * 2 + 2])
                    } else {
                        Vec2::ZERO
                    };
                    vertices.push(Vertex {
                        position: positions[k].to_array(),
                        normal: normal.to_array(),
                        uv: uv.to_array(),
                    });
                }
            }
        }

        log::debug!("Parsed OBJ '{name}': {} models, {} vertices", models.len(), vertices.len());

        Ok(Self {
            name: name.to_string(),
            vertices,
        })
    }

    /// Axis-aligned cube centred on the origin with outward normals and
    /// counter-clockwise front faces.
    #[must_use]
    pub fn cube(half_extent: f32) -> Self {
        // (normal, u, v) with u × v = normal
        const FACES: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        const QUAD: [(f32, f32); 6] = [
            (-1.0, -1.0),
            (1.0, -1.0),
            (1.0, 1.0),
            (-1.0, -1.0),
            (1.0, 1.0),
            (-1.0, 1.0),
        ];

        let h = half_extent;
        let mut vertices = Vec::with_capacity(36);
        for (n, u, v) in FACES {
            for (su, sv) in QUAD {
                let p = (n + u * su + v * sv) * h;
                vertices.push(Vertex {
                    position: p.to_array(),
                    normal: n.to_array(),
                    uv: [su * 0.5 + 0.5, sv * 0.5 + 0.5],
                });
            }
        }

        Self {
            name: "cube".to_string(),
            vertices,
        }
    }

    /// A mesh with no vertices. Drawing it is a no-op.
    #[must_use]
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vertices: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD_OBJ: &str = "\
o quad
v -1 -1 0
v  1 -1 0
v  1  1 0
v -1  1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn quad_is_triangulated_and_expanded() {
        let mesh = MeshData::from_obj_reader("quad", &mut Cursor::new(QUAD_OBJ)).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn missing_normals_are_computed_from_faces() {
        let mesh = MeshData::from_obj_reader("quad", &mut Cursor::new(QUAD_OBJ)).unwrap();
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn texcoords_are_carried_through() {
        let mesh = MeshData::from_obj_reader("quad", &mut Cursor::new(QUAD_OBJ)).unwrap();
        assert_eq!(mesh.vertices[1].uv, [1.0, 0.0]);
    }

    #[test]
    fn cube_faces_wind_outward() {
        let cube = MeshData::cube(1.0);
        assert_eq!(cube.vertex_count(), 36);
        for tri in cube.vertices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec3::from(v.position));
            let n = (b - a).cross(c - a).normalize();
            assert!((n - Vec3::from(tri[0].normal)).length() < 1e-5);
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MeshData::load_obj("does/not/exist.obj").unwrap_err();
        assert!(matches!(err, UmbraError::AssetNotFound(p) if p.contains("exist.obj")));
    }
}
