//! # Umbra
//!
//! A deferred G-buffer renderer with screen-space ambient occlusion.
//!
//! One mesh, one fly camera and a fixed chain of GPU passes:
//!
//! ```text
//! Geometry ─► SSAO ─► SSAO Blur ─► Skybox ─► Lighting ─► Present
//! ```
//!
//! Any intermediate buffer can be routed to the display through
//! [`DebugView`](renderer::DebugView).
//!
//! ```rust,ignore
//! use umbra::{App, AppConfig};
//!
//! fn main() -> umbra::errors::Result<()> {
//!     App::new(AppConfig::default()).run()
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod app;
pub mod config;
pub mod engine;
pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod utils;

pub use app::App;
pub use config::AppConfig;
pub use engine::Engine;
pub use errors::{Result, UmbraError};
pub use renderer::{DebugView, Renderer};
pub use resources::{Input, Key, MeshData, SampleKernel};
pub use scene::{FlyCamera, FrameState, SessionState, Technique};
