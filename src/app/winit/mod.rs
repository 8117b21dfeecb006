//! Winit-based Application Frontend
//!
//! [`App`] loads the scene assets, opens a fixed-size window and drives an
//! [`Engine`] from winit's event loop:
//!
//! - keyboard, mouse and resize events go through [`input_adapter`]
//! - every `RedrawRequested` runs update then render
//! - cursor requests from the camera are applied to the window
//! - Escape or closing the window shuts the renderer down and exits
//!
//! ```rust,ignore
//! use umbra::{App, AppConfig};
//!
//! fn main() -> umbra::Result<()> {
//!     App::new(AppConfig::from_env()?).run()
//! }
//! ```

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::engine::Engine;
use crate::errors::{Result, UmbraError};
use crate::renderer::Renderer;
use crate::resources::SceneAssets;
use crate::scene::CursorCommand;

pub mod input_adapter;

/// File written by the screenshot key.
pub const SCREENSHOT_PATH: &str = "screenshot.png";

/// Application builder.
pub struct App {
    config: AppConfig,
}

impl App {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.window.title = title.into();
        self
    }

    /// Loads assets, then blocks in the event loop until exit.
    ///
    /// Any initialization failure (assets, adapter, shaders, targets) is
    /// returned before a single frame is rendered.
    pub fn run(mut self) -> Result<()> {
        self.config.validate()?;
        let assets = SceneAssets::load(&self.config.scene)?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner::new(self.config, assets);
        event_loop.run_app(&mut runner)?;

        match runner.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// Implements winit's `ApplicationHandler` around an [`Engine`].
struct AppRunner {
    config: AppConfig,
    assets: Option<SceneAssets>,

    window: Option<Arc<Window>>,
    engine: Option<Engine>,

    last_loop_time: Instant,
    error: Option<UmbraError>,
}

impl AppRunner {
    fn new(config: AppConfig, assets: SceneAssets) -> Self {
        Self {
            config,
            assets: Some(assets),
            window: None,
            engine: None,
            last_loop_time: Instant::now(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        self.window = Some(window.clone());

        log::info!("Initializing Renderer Backend...");

        let Some(assets) = self.assets.take() else {
            return Err(UmbraError::EmptyMeshCatalog);
        };
        let size = window.inner_size();
        let renderer = Renderer::new(window, size.width, size.height, &self.config, &assets)?;

        self.engine = Some(Engine::new(renderer, &self.config));
        self.last_loop_time = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: UmbraError) {
        log::error!("Fatal error: {error}");
        self.error = Some(error);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(engine) = &mut self.engine {
            engine.shutdown();
        }
        event_loop.exit();
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_loop_time).as_secs_f32();
        self.last_loop_time = now;

        let (Some(window), Some(engine)) = (&self.window, &mut self.engine) else {
            return;
        };

        // =========================================================
        // Update
        // =========================================================
        let outcome = engine.update(dt);

        for command in &outcome.cursor {
            match *command {
                CursorCommand::Hide => window.set_cursor_visible(false),
                CursorCommand::Show => window.set_cursor_visible(true),
                CursorCommand::Recenter(centre) => {
                    let position = PhysicalPosition::new(f64::from(centre.x), f64::from(centre.y));
                    if let Err(e) = window.set_cursor_position(position) {
                        log::warn!("Cursor recenter failed: {e}");
                    }
                    // The warp produces no event on some platforms
                    engine.input.inject_mouse_position(centre.x, centre.y);
                }
            }
        }

        if outcome.exit_requested {
            self.shutdown(event_loop);
            return;
        }

        // =========================================================
        // Render
        // =========================================================
        if let Err(e) = engine.render() {
            log::error!("Render error: {e}");
        }

        if outcome.screenshot_requested
            && let Err(e) = engine.renderer.save_screenshot(SCREENSHOT_PATH)
        {
            log::error!("Screenshot failed: {e}");
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(engine) = &mut self.engine else {
            return;
        };

        input_adapter::process_window_event(&mut engine.input, &event);

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(physical_size) => {
                engine.resize(physical_size.width, physical_size.height);
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.engine.is_some()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = &mut self.engine {
            engine.shutdown();
        }
    }
}
