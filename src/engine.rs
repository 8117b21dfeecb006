//! Engine Core Module
//!
//! [`Engine`] ties the session state, the input container and the renderer
//! into the two-phase frame loop:
//!
//! 1. [`Engine::update`] mutates [`SessionState`] from this frame's input.
//! 2. [`Engine::render`] takes a [`FrameState`](crate::scene::FrameState)
//!    snapshot by value and runs the pass chain on it.
//!
//! The snapshot is taken after the update has finished, so nothing the
//! render step reads can change underneath it. No window types appear here;
//! the winit frontend in [`app`](crate::app) drives it.

use glam::UVec2;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::renderer::Renderer;
use crate::renderer::graph::FrameReport;
use crate::resources::input::Input;
use crate::scene::{SessionState, UpdateOutcome};
use crate::utils::FpsCounter;

pub struct Engine {
    pub renderer: Renderer,
    pub session: SessionState,
    pub input: Input,

    fps: FpsCounter,
    time: f32,
}

impl Engine {
    /// Wraps an initialized renderer. The session viewport is the renderer's
    /// target size.
    #[must_use]
    pub fn new(renderer: Renderer, config: &AppConfig) -> Self {
        let (width, height) = renderer.target_size();
        let mut input = Input::new();
        input.inject_resize(width, height);

        Self {
            renderer,
            session: SessionState::new(config, UVec2::new(width, height)),
            input,
            fps: FpsCounter::new(),
            time: 0.0,
        }
    }

    /// Applies this frame's input, then clears the per-frame input sets.
    pub fn update(&mut self, dt: f32) -> UpdateOutcome {
        self.time += dt;
        let outcome = self.session.update(&self.input, dt);
        self.input.start_frame();
        outcome
    }

    /// Renders one frame from a fresh snapshot of the session.
    pub fn render(&mut self) -> Result<Option<FrameReport>> {
        let frame = self.session.frame();
        let report = self.renderer.render(&frame)?;

        if let Some(fps) = self.fps.update() {
            log::info!("FPS: {fps:.1}");
        }
        Ok(report)
    }

    /// Window resize: the surface and the input raster follow, render
    /// targets do not.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize_surface(width, height);
        self.input.inject_resize(width, height);
    }

    /// Total elapsed time in seconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.session.frame_index()
    }

    pub fn shutdown(&mut self) {
        self.renderer.shutdown();
    }
}
