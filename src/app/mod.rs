//! Application layer: the winit window and event loop.

pub mod winit;

pub use self::winit::App;
