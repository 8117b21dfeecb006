//! wgpu Context
//!
//! [`GpuContext`] holds the core GPU handles: device, queue and, when a
//! window exists, the presentation surface with its configuration. A
//! headless context has no surface and presents into an offscreen target.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::errors::{Result, UmbraError};
use crate::renderer::settings::RenderSettings;

/// Format of the offscreen target that stands in for the surface when headless.
pub const HEADLESS_PRESENT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Window surface plus its live configuration.
pub struct SurfaceState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
}

/// Core wgpu context holding GPU handles.
pub struct GpuContext {
    /// The wgpu device for GPU operations
    pub device: wgpu::Device,
    /// The command queue for submitting work
    pub queue: wgpu::Queue,
    /// `None` when running headless
    pub surface: Option<SurfaceState>,
    /// Colour format of whatever the present pass writes into
    pub present_format: wgpu::TextureFormat,
    /// Clear colour for the composite target
    pub clear_color: wgpu::Color,
}

impl GpuContext {
    /// Creates a context presenting to `window`.
    pub async fn new<W>(window: W, settings: &RenderSettings, width: u32, height: u32) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference.to_wgpu(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| UmbraError::AdapterRequestFailed(e.to_string()))?;

        let (device, queue) = Self::request_device(&adapter).await?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or(UmbraError::SurfaceUnsupported)?;

        // Targets hold linear values; let the surface do the sRGB encode
        let caps = surface.get_capabilities(&adapter);
        if let Some(srgb) = caps.formats.iter().copied().find(wgpu::TextureFormat::is_srgb) {
            config.format = srgb;
        }
        config.present_mode = settings.present_mode();
        surface.configure(&device, &config);

        log::info!(
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            device,
            queue,
            present_format: config.format,
            surface: Some(SurfaceState { surface, config }),
            clear_color: settings.clear_color(),
        })
    }

    /// Creates a context without a window.
    pub async fn new_headless(settings: &RenderSettings) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference.to_wgpu(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| UmbraError::AdapterRequestFailed(e.to_string()))?;

        let (device, queue) = Self::request_device(&adapter).await?;

        Ok(Self {
            device,
            queue,
            surface: None,
            present_format: HEADLESS_PRESENT_FORMAT,
            clear_color: settings.clear_color(),
        })
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Umbra Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;
        Ok((device, queue))
    }

    /// Reconfigures the presentation surface. Render targets are untouched.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(state) = &mut self.surface {
            state.config.width = width;
            state.config.height = height;
            state.surface.configure(&self.device, &state.config);
            log::debug!("Surface resized to {width}x{height}");
        }
    }

    /// Re-applies the current configuration after a lost/outdated surface.
    pub fn reconfigure_surface(&self) {
        if let Some(state) = &self.surface {
            state.surface.configure(&self.device, &state.config);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_headless(&self) -> bool {
        self.surface.is_none()
    }

    /// Current surface size, or `None` when headless.
    #[inline]
    #[must_use]
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface.as_ref().map(|s| (s.config.width, s.config.height))
    }
}
