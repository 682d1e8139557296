//! GPU texture management.

use clipfx_core::{ClipFxError, Result, BYTES_PER_PIXEL};

/// Format of every texture the compositor owns.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A texture plus its default view.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl GpuTexture {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        usage: wgpu::TextureUsages,
        label: Option<&str>,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Sampled texture that receives uploads (clip sources, the curve LUT).
    pub fn sampled(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        Self::new(
            device,
            width,
            height,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            Some(label),
        )
    }

    /// Render target that can be read back.
    pub fn render_target(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::new(
            device,
            width,
            height,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            Some("Compositor Target"),
        )
    }

    /// Upload tightly packed RGBA8 pixels covering the whole texture.
    pub fn upload_rgba(&self, queue: &wgpu::Queue, pixels: &[u8]) -> Result<()> {
        let expected = self.width as usize * self.height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(ClipFxError::InvalidParameter(format!(
                "Pixel buffer of {} bytes doesn't match texture size {}x{}",
                pixels.len(),
                self.width,
                self.height
            )));
        }
        if expected == 0 {
            return Ok(());
        }

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(self.width * BYTES_PER_PIXEL as u32),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        Ok(())
    }
}

/// Row pitch for a texture-to-buffer copy, padded to wgpu's alignment.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL as u32;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}
