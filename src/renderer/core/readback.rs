//! Texture readback.
//!
//! Copies a texture into a staging buffer with rows padded to
//! `COPY_BYTES_PER_ROW_ALIGNMENT`, waits for the map, then strips the padding.

use crate::errors::{Result, UmbraError};
use crate::renderer::core::targets::RenderTarget;

/// Tightly packed texel data of one target.
#[derive(Debug, Clone)]
pub struct TextureReadback {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub bytes_per_pixel: u32,
    pub bytes: Vec<u8>,
}

impl TextureReadback {
    /// Raw bytes of the texel at `(x, y)`.
    #[must_use]
    pub fn texel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.bytes_per_pixel as usize;
        let start = (y as usize * self.width as usize + x as usize) * bpp;
        &self.bytes[start..start + bpp]
    }
}

pub fn read_target(device: &wgpu::Device, queue: &wgpu::Queue, target: &RenderTarget) -> Result<TextureReadback> {
    let bytes_per_pixel = target
        .format
        .block_copy_size(None)
        .ok_or_else(|| UmbraError::ReadbackFailed(format!("'{}' format {:?} is not copyable", target.label, target.format)))?;

    let tight_bpr = target.width * bytes_per_pixel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bpr = tight_bpr.div_ceil(align) * align;

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Staging"),
        size: u64::from(padded_bpr) * u64::from(target.height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bpr),
                rows_per_image: Some(target.height),
            },
        },
        wgpu::Extent3d {
            width: target.width,
            height: target.height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (sender, receiver) = flume::bounded(1);
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(|e| UmbraError::ReadbackFailed(e.to_string()))?;

    receiver
        .recv()
        .map_err(|_| UmbraError::ReadbackFailed("map_async callback dropped".to_string()))?
        .map_err(|e| UmbraError::ReadbackFailed(e.to_string()))?;

    let mut bytes = Vec::with_capacity((tight_bpr * target.height) as usize);
    {
        let data = slice.get_mapped_range();
        for row in data.chunks_exact(padded_bpr as usize) {
            bytes.extend_from_slice(&row[..tight_bpr as usize]);
        }
    }
    staging.unmap();

    log::trace!("Read back '{}' ({} bytes)", target.label, bytes.len());

    Ok(TextureReadback {
        width: target.width,
        height: target.height,
        format: target.format,
        bytes_per_pixel,
        bytes,
    })
}
