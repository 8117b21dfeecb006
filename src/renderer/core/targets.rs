//! Framebuffer Resource Set
//!
//! Every off-screen target is allocated once at the viewport size and kept
//! until shutdown. Nothing in here ever reallocates on resize.
//!
//! | Target            | Format          | Written by | Read by                 |
//! |-------------------|-----------------|------------|-------------------------|
//! | G-buffer position | `Rgba16Float`   | Geometry   | SSAO, Lighting, Present |
//! | G-buffer normal   | `Rgba16Float`   | Geometry   | SSAO, Lighting, Present |
//! | G-buffer depth    | `Depth32Float`  | Geometry   | Skybox (test only)      |
//! | Aux depth         | `Depth32Float`  | SSAO, Blur | -                       |
//! | SSAO raw          | `R8Unorm`       | SSAO       | Blur, Present           |
//! | SSAO blurred      | `R8Unorm`       | Blur       | Lighting, Present       |
//! | Composite         | `Rgba8UnormSrgb`| Skybox, Lighting | Present           |
//!
//! The G-buffer position `w` channel is 1 where geometry was drawn and 0
//! elsewhere, which is how later passes tell surface from background.

use crate::errors::{Result, UmbraError};
use crate::renderer::core::context::HEADLESS_PRESENT_FORMAT;
use crate::renderer::graph::Resource;
use crate::resources::ssao::{NOISE_TILE_SIZE, NoiseTile};

pub const GBUFFER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
pub const SSAO_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;
pub const COMPOSITE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const NOISE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// A single texture with its default view.
pub struct RenderTarget {
    pub label: &'static str,
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    /// Allocates a 2D target, failing if the device cannot hold it.
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Result<Self> {
        let max = device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(UmbraError::TargetAllocation {
                label: label.to_string(),
                message: format!("{width}x{height} outside 1..={max}"),
            });
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("Allocated target '{label}' {width}x{height} {format:?}");

        Ok(Self {
            label,
            texture,
            view,
            format,
            width,
            height,
        })
    }

    fn color(device: &wgpu::Device, label: &'static str, width: u32, height: u32, format: wgpu::TextureFormat) -> Result<Self> {
        Self::new(
            device,
            label,
            width,
            height,
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
        )
    }

    fn depth(device: &wgpu::Device, label: &'static str, width: u32, height: u32) -> Result<Self> {
        Self::new(
            device,
            label,
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        )
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Position + normal with the geometry pass's depth buffer.
pub struct GBuffer {
    pub position: RenderTarget,
    pub normal: RenderTarget,
    pub depth: RenderTarget,
}

/// Owns every render target and the noise texture for the session.
pub struct ResourceSet {
    pub gbuffer: GBuffer,
    /// Depth attachment shared by the SSAO and blur passes.
    pub aux_depth: RenderTarget,
    pub ssao_raw: RenderTarget,
    pub ssao_blurred: RenderTarget,
    pub composite: RenderTarget,
    /// Stand-in for the surface when headless.
    pub presented: Option<RenderTarget>,

    pub noise_texture: wgpu::Texture,
    pub noise_view: wgpu::TextureView,

    width: u32,
    height: u32,
}

impl ResourceSet {
    pub fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        noise: &NoiseTile,
        headless: bool,
    ) -> Result<Self> {
        let gbuffer = GBuffer {
            position: RenderTarget::color(device, "GBuffer Position", width, height, GBUFFER_FORMAT)?,
            normal: RenderTarget::color(device, "GBuffer Normal", width, height, GBUFFER_FORMAT)?,
            depth: RenderTarget::depth(device, "GBuffer Depth", width, height)?,
        };
        let aux_depth = RenderTarget::depth(device, "SSAO Depth", width, height)?;
        let ssao_raw = RenderTarget::color(device, "SSAO Raw", width, height, SSAO_FORMAT)?;
        let ssao_blurred = RenderTarget::color(device, "SSAO Blurred", width, height, SSAO_FORMAT)?;
        let composite = RenderTarget::color(device, "Composite", width, height, COMPOSITE_FORMAT)?;
        let presented = if headless {
            Some(RenderTarget::color(device, "Headless Present", width, height, HEADLESS_PRESENT_FORMAT)?)
        } else {
            None
        };

        let (noise_texture, noise_view) = Self::upload_noise(device, queue, noise);

        log::info!("Render targets allocated at {width}x{height}");

        Ok(Self {
            gbuffer,
            aux_depth,
            ssao_raw,
            ssao_blurred,
            composite,
            presented,
            noise_texture,
            noise_view,
            width,
            height,
        })
    }

    fn upload_noise(device: &wgpu::Device, queue: &wgpu::Queue, noise: &NoiseTile) -> (wgpu::Texture, wgpu::TextureView) {
        let size = wgpu::Extent3d {
            width: NOISE_TILE_SIZE,
            height: NOISE_TILE_SIZE,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("SSAO Noise 4x4"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: NOISE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &noise.to_rgba16f_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(NOISE_TILE_SIZE * 8),
                rows_per_image: Some(NOISE_TILE_SIZE),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Allocation size; identical for every target.
    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Looks up the target backing a graph resource.
    #[must_use]
    pub fn target(&self, resource: Resource) -> Option<&RenderTarget> {
        match resource {
            Resource::GBufferPosition => Some(&self.gbuffer.position),
            Resource::GBufferNormal => Some(&self.gbuffer.normal),
            Resource::GBufferDepth => Some(&self.gbuffer.depth),
            Resource::AuxDepth => Some(&self.aux_depth),
            Resource::SsaoRaw => Some(&self.ssao_raw),
            Resource::SsaoBlurred => Some(&self.ssao_blurred),
            Resource::Composite => Some(&self.composite),
            Resource::Display => self.presented.as_ref(),
            _ => None,
        }
    }

    /// Releases GPU memory ahead of drop.
    pub fn destroy(&self) {
        for target in [
            &self.gbuffer.position,
            &self.gbuffer.normal,
            &self.gbuffer.depth,
            &self.aux_depth,
            &self.ssao_raw,
            &self.ssao_blurred,
            &self.composite,
        ] {
            target.texture.destroy();
        }
        if let Some(presented) = &self.presented {
            presented.texture.destroy();
        }
        self.noise_texture.destroy();
    }
}
