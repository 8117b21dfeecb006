//! Utility Module
//!
//! - [`FpsCounter`]: frame rate measurement, logged once per second

pub mod fps_counter;

pub use fps_counter::FpsCounter;
