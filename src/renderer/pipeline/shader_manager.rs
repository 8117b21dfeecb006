//! Shader Template Manager
//!
//! WGSL sources are minijinja templates embedded with `rust-embed`. Debug
//! builds read them from disk first so shaders can be edited without a
//! rebuild. Rendered sources are hashed with xxh3-128 and compiled modules
//! are cached by that hash.
//!
//! ## Template syntax
//!
//! | Construct            | Example                                |
//! |----------------------|----------------------------------------|
//! | Block                | `{$ include 'frame' $}`                |
//! | Line statement       | `$$ if REFLECTIVE is defined`          |
//! | Variable             | `{{ KERNEL_SIZE }}`                    |
//!
//! Includes resolve to `chunks/<name>.wgsl`.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use minijinja::{Environment, Error, ErrorKind, syntax::SyntaxConfig};
use rust_embed::RustEmbed;
use rustc_hash::FxHashMap;
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_128;

use crate::errors::{Result, UmbraError};

pub static SHADER_ENV: OnceLock<Environment<'static>> = OnceLock::new();

#[derive(RustEmbed)]
#[folder = "src/renderer/pipeline/shaders"]
struct ShaderAssets;

pub fn get_env() -> &'static Environment<'static> {
    SHADER_ENV.get_or_init(|| {
        let mut env = Environment::new();

        match SyntaxConfig::builder()
            .block_delimiters("{$", "$}")
            .variable_delimiters("{{", "}}")
            .line_statement_prefix("$$")
            .build()
        {
            Ok(syntax) => env.set_syntax(syntax),
            Err(e) => log::error!("Failed to configure shader template syntax: {e}"),
        }

        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_undefined_behavior(minijinja::UndefinedBehavior::SemiStrict);
        env.set_loader(shader_loader);
        env.set_path_join_callback(|name, _parent| format!("chunks/{name}").into());

        env
    })
}

fn shader_loader(name: &str) -> std::result::Result<Option<String>, Error> {
    let filename = if std::path::Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wgsl"))
    {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{name}.wgsl"))
    };

    #[cfg(debug_assertions)]
    {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("src/renderer/pipeline/shaders")
            .join(filename.as_ref());
        if path.exists() {
            return match std::fs::read_to_string(&path) {
                Ok(source) => Ok(Some(source)),
                Err(e) => Err(Error::new(
                    ErrorKind::TemplateNotFound,
                    format!("Failed to read file: {e}"),
                )),
            };
        }
    }

    if let Some(file) = ShaderAssets::get(&filename)
        && let Ok(source) = std::str::from_utf8(file.data.as_ref())
    {
        return Ok(Some(source.to_string()));
    }

    Ok(None)
}

// ─── Defines ──────────────────────────────────────────────────────────────────

/// Template variables for one program variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ShaderDefines {
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

impl ShaderDefines {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    /// Flag-style define, tested with `is defined` in templates.
    #[must_use]
    pub fn flag(self, name: &str) -> Self {
        self.with(name, "1")
    }
}

// ─── Reflection ───────────────────────────────────────────────────────────────

/// Group/binding pair of a resource declared in WGSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingSlot {
    pub group: u32,
    pub binding: u32,
}

/// Collects every `@group(G) @binding(B) var<...> name: T;` declaration.
#[must_use]
pub fn reflect_bindings(source: &str) -> FxHashMap<String, BindingSlot> {
    let mut bindings = FxHashMap::default();

    for line in source.lines().map(str::trim) {
        if line.starts_with("//") {
            continue;
        }
        let (Some(group), Some(binding)) = (attribute_value(line, "@group("), attribute_value(line, "@binding(")) else {
            continue;
        };
        let Some(var_pos) = line.find("var") else {
            continue;
        };

        let mut rest = line[var_pos + 3..].trim_start();
        if let Some(qualified) = rest.strip_prefix('<') {
            let Some(end) = qualified.find('>') else {
                continue;
            };
            rest = &qualified[end + 1..];
        }

        let name = rest.split(':').next().unwrap_or_default().trim();
        if !name.is_empty() {
            bindings.insert(name.to_string(), BindingSlot { group, binding });
        }
    }

    bindings
}

fn attribute_value(line: &str, prefix: &str) -> Option<u32> {
    let start = line.find(prefix)? + prefix.len();
    let len = line[start..].find(')')?;
    line[start..start + len].trim().parse().ok()
}

// ─── ShaderProgram ────────────────────────────────────────────────────────────

/// A compiled module plus the bindings its source declares.
pub struct ShaderProgram {
    pub name: String,
    pub module: wgpu::ShaderModule,
    pub hash: u128,
    bindings: FxHashMap<String, BindingSlot>,
}

impl ShaderProgram {
    /// Looks up a binding by variable name.
    pub fn binding(&self, name: &str) -> Result<BindingSlot> {
        self.bindings
            .get(name)
            .copied()
            .ok_or_else(|| UmbraError::MissingBinding {
                technique: self.name.clone(),
                binding: name.to_string(),
            })
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

// ─── ShaderManager ────────────────────────────────────────────────────────────

/// Centralized shader module cache keyed by the xxh3-128 of the final WGSL.
pub struct ShaderManager {
    module_cache: FxHashMap<u128, wgpu::ShaderModule>,
}

impl Default for ShaderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            module_cache: FxHashMap::default(),
        }
    }

    /// Renders a template to WGSL without compiling it.
    pub fn render_source(name: &str, defines: &ShaderDefines) -> Result<String> {
        let template_error = |e: Error| UmbraError::ShaderTemplate {
            technique: name.to_string(),
            message: e.to_string(),
        };
        let template = get_env().get_template(name).map_err(template_error)?;
        template.render(defines).map_err(template_error)
    }

    /// Renders, reflects and compiles a program (or reuses a cached module).
    pub fn load_program(&mut self, device: &wgpu::Device, name: &str, defines: &ShaderDefines) -> Result<ShaderProgram> {
        let source = Self::render_source(name, defines)?;
        let hash = xxh3_128(source.as_bytes());
        let bindings = reflect_bindings(&source);

        let module = self
            .module_cache
            .entry(hash)
            .or_insert_with(|| {
                log::debug!("Compiling shader '{name}' ({hash:032x})");
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(&format!("Shader Module {name}")),
                    source: wgpu::ShaderSource::Wgsl(source.into()),
                })
            })
            .clone();

        Ok(ShaderProgram {
            name: name.to_string(),
            module,
            hash,
            bindings,
        })
    }

    /// Returns the number of cached shader modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.module_cache.len()
    }
}
