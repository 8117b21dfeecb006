//! Lighting technique registry.
//!
//! Maps each [`Technique`] to the program it was compiled from and the
//! pipeline built on it, so adding a technique means adding one entry
//! here instead of growing parallel arrays.

use rustc_hash::FxHashMap;

use super::shader_manager::{ShaderDefines, ShaderManager, ShaderProgram};
use crate::errors::Result;
use crate::scene::Technique;

pub struct TechniqueRecord {
    pub program: ShaderProgram,
    pub pipeline: wgpu::RenderPipeline,
}

#[derive(Default)]
pub struct TechniqueRegistry {
    records: FxHashMap<Technique, TechniqueRecord>,
}

impl TechniqueRegistry {
    /// Template defines for a technique's lighting program.
    #[must_use]
    pub fn defines(technique: Technique) -> ShaderDefines {
        match technique {
            Technique::Phong => ShaderDefines::new(),
            Technique::Reflective => ShaderDefines::new().flag("REFLECTIVE"),
        }
    }

    /// Compiles every technique, building each pipeline with `build`.
    pub fn build<F>(device: &wgpu::Device, shaders: &mut ShaderManager, template: &str, mut build: F) -> Result<Self>
    where
        F: FnMut(Technique, &ShaderProgram) -> Result<wgpu::RenderPipeline>,
    {
        let mut records = FxHashMap::default();
        for technique in Technique::ALL {
            let program = shaders.load_program(device, template, &Self::defines(technique))?;
            let pipeline = build(technique, &program)?;
            log::info!("Compiled lighting technique '{}'", technique.name());
            records.insert(technique, TechniqueRecord { program, pipeline });
        }
        Ok(Self { records })
    }

    #[must_use]
    pub fn get(&self, technique: Technique) -> Option<&TechniqueRecord> {
        self.records.get(&technique)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
