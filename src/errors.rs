//! Error Types
//!
//! [`UmbraError`] covers every failure the renderer can report. Nearly all
//! of them happen during initialization: a missing mesh, a shader binding
//! that cannot be found, a render target the device cannot allocate. Once
//! the frame loop is running the only expected failure is a lost surface,
//! which is handled by reconfiguring rather than by returning an error.
//!
//! All public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, UmbraError>`.

use thiserror::Error;

/// The main error type.
///
/// Variants that concern a named resource carry that name so the log line
/// is enough to tell which asset, technique or target failed.
#[derive(Error, Debug)]
pub enum UmbraError {
    // ========================================================================
    // GPU & Windowing Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create a presentation surface for the window.
    #[error("Failed to create surface: {0}")]
    SurfaceCreateFailed(#[from] wgpu::CreateSurfaceError),

    /// The adapter cannot present to the created surface.
    #[error("Surface is not supported by the selected adapter")]
    SurfaceUnsupported,

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    /// Window creation error (winit).
    #[error("Window creation error: {0}")]
    WindowCreateFailed(#[from] winit::error::OsError),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// An OBJ file could not be parsed.
    #[error("Failed to load mesh '{path}': {reason}")]
    MeshLoadFailed {
        /// Path of the mesh file
        path: String,
        /// Parser message
        reason: String,
    },

    /// The configured mesh catalog has no entries.
    #[error("Mesh catalog is empty")]
    EmptyMeshCatalog,

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),

    /// Cube map validation error.
    #[error("Cube map error: {0}")]
    CubeMapError(String),

    // ========================================================================
    // Shader & Pipeline Errors
    // ========================================================================
    /// A shader template failed to render.
    #[error("Shader template error in '{technique}': {message}")]
    ShaderTemplate {
        /// Program name
        technique: String,
        /// Template engine message
        message: String,
    },

    /// A named resource binding is not declared by the program.
    #[error("Shader '{technique}' has no binding named '{binding}'")]
    MissingBinding {
        /// Program name
        technique: String,
        /// Variable name that was looked up
        binding: String,
    },

    // ========================================================================
    // Render Target & Graph Errors
    // ========================================================================
    /// A render target could not be allocated.
    #[error("Failed to allocate render target '{label}': {message}")]
    TargetAllocation {
        /// Target label
        label: String,
        /// Reason
        message: String,
    },

    /// A pass reads a resource that no earlier pass produced this frame,
    /// or reads the resource it writes.
    #[error("Render graph ordering violation in pass '{pass}' on {resource}")]
    GraphOrdering {
        /// Offending pass label
        pass: String,
        /// Offending resource
        resource: String,
    },

    /// Mapping a readback buffer failed.
    #[error("GPU readback failed: {0}")]
    ReadbackFailed(String),

    // ========================================================================
    // Configuration & I/O Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("Config parse error: {0}")]
    ConfigError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<image::ImageError> for UmbraError {
    fn from(err: image::ImageError) -> Self {
        UmbraError::ImageDecodeError(err.to_string())
    }
}

/// Alias for `Result<T, UmbraError>`.
pub type Result<T> = std::result::Result<T, UmbraError>;
