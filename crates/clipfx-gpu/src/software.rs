//! CPU implementation of [`RenderBackend`].
//!
//! Rasterizes each quad on the CPU and runs the fragment stage from the same
//! uniform block and textures the GPU would see. Used when no adapter is
//! available and as the deterministic reference for compositor tests.

use std::collections::HashMap;
use std::sync::Arc;

use clipfx_color::CurveLuts;
use clipfx_core::{ClipFxError, FrameBuffer, Result, Vec2};
use clipfx_effects::sample_blurred_at;
use parking_lot::Mutex;
use tracing::debug;

use crate::backend::{Quad, RenderBackend, TextureHandle};
use crate::uniforms::ClipUniforms;

/// Counters recorded by [`SoftwareBackend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendStats {
    pub textures_created: usize,
    /// Every destroyed handle, in order; a handle appears once per release.
    pub destroyed: Vec<TextureHandle>,
    pub uploads: HashMap<TextureHandle, usize>,
    pub draws: usize,
    pub dispose_calls: usize,
}

impl BackendStats {
    pub fn uploads_to(&self, texture: TextureHandle) -> usize {
        self.uploads.get(&texture).copied().unwrap_or(0)
    }

    pub fn total_uploads(&self) -> usize {
        self.uploads.values().sum()
    }
}

pub struct SoftwareBackend {
    target: FrameBuffer,
    textures: HashMap<TextureHandle, FrameBuffer>,
    next_id: u64,
    uniforms: ClipUniforms,
    stats: Arc<Mutex<BackendStats>>,
    disposed: bool,
}

#[inline]
fn unorm(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl SoftwareBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: FrameBuffer::new(width, height),
            textures: HashMap::new(),
            next_id: 1,
            uniforms: ClipUniforms::default(),
            stats: Arc::new(Mutex::new(BackendStats::default())),
            disposed: false,
        }
    }

    /// Shared view of the counters. Stays readable after the backend is gone.
    pub fn stats_handle(&self) -> Arc<Mutex<BackendStats>> {
        Arc::clone(&self.stats)
    }

    pub fn stats(&self) -> BackendStats {
        self.stats.lock().clone()
    }

    fn check_live(&self) -> Result<()> {
        if self.disposed {
            Err(ClipFxError::Gpu("Backend has been disposed".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RenderBackend for SoftwareBackend {
    fn name(&self) -> &'static str {
        "software"
    }

    fn target_size(&self) -> (u32, u32) {
        (self.target.width, self.target.height)
    }

    fn create_texture(&mut self, width: u32, height: u32, _label: &str) -> Result<TextureHandle> {
        self.check_live()?;
        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        self.textures.insert(handle, FrameBuffer::new(width, height));
        self.stats.lock().textures_created += 1;
        Ok(handle)
    }

    fn upload(&mut self, texture: TextureHandle, pixels: &[u8]) -> Result<()> {
        let tex = self
            .textures
            .get_mut(&texture)
            .ok_or_else(|| ClipFxError::NotFound(format!("texture {}", texture.0)))?;
        if pixels.len() != tex.as_bytes().len() {
            return Err(ClipFxError::InvalidParameter(format!(
                "Pixel buffer of {} bytes doesn't match texture size {}x{}",
                pixels.len(),
                tex.width,
                tex.height
            )));
        }
        tex.as_bytes_mut().copy_from_slice(pixels);
        *self.stats.lock().uploads.entry(texture).or_insert(0) += 1;
        Ok(())
    }

    fn set_uniforms(&mut self, uniforms: &ClipUniforms) {
        self.uniforms = *uniforms;
    }

    fn draw(&mut self, texture: TextureHandle, lut: TextureHandle, quad: &Quad) -> Result<()> {
        self.check_live()?;
        let source = self
            .textures
            .get(&texture)
            .ok_or_else(|| ClipFxError::NotFound(format!("texture {}", texture.0)))?;
        let lut = self
            .textures
            .get(&lut)
            .ok_or_else(|| ClipFxError::NotFound(format!("texture {}", lut.0)))?;
        self.stats.lock().draws += 1;

        let u = self.uniforms;
        let curves = if u.curves_enabled() {
            CurveLuts::from_rgba_texels(lut.as_bytes())
        } else {
            None
        };
        let plan = u.to_plan(curves);
        let wipe = u.wipe_rect();
        let (opacity, blur) = (u.opacity(), u.blur());

        let (tw, th) = (self.target.width, self.target.height);
        let dest = quad.dest;
        if source.pixel_count() == 0 || dest.width <= 0.0 || dest.height <= 0.0 {
            return Ok(());
        }
        let (sw, sh) = (source.width as f32, source.height as f32);

        let x_start = dest.x.floor().max(0.0) as u32;
        let y_start = dest.y.floor().max(0.0) as u32;
        let x_end = ((dest.x + dest.width).ceil().max(0.0) as u32).min(tw);
        let y_end = ((dest.y + dest.height).ceil().max(0.0) as u32).min(th);

        for y in y_start..y_end {
            for x in x_start..x_end {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !dest.contains(center) {
                    continue;
                }
                if let Some(w) = &wipe {
                    if !w.contains(center.x / tw as f32, center.y / th as f32) {
                        continue;
                    }
                }

                let uv = (center - dest.min()) / Vec2::new(dest.width, dest.height);
                let [r, g, b, a] = sample_blurred_at(source, uv.x * sw, uv.y * sh, blur);
                let keyed = plan.shade([r, g, b]);
                let alpha = (a / 255.0) * plan.output_alpha(&keyed) * opacity;

                // Straight alpha blending, as configured on the GPU pipeline.
                let dst = self.target.pixel(x, y);
                let mut out = [0u8; 4];
                for c in 0..3 {
                    let s = (keyed.rgb[c] / 255.0).clamp(0.0, 1.0);
                    let d = dst[c] as f32 / 255.0;
                    out[c] = unorm(s * alpha + d * (1.0 - alpha));
                }
                out[3] = unorm(alpha + dst[3] as f32 / 255.0 * (1.0 - alpha));
                self.target.set_pixel(x, y, out);
            }
        }
        Ok(())
    }

    fn begin_frame(&mut self, clear: [f32; 4]) -> Result<()> {
        self.check_live()?;
        let rgba = clear.map(unorm);
        for px in self.target.as_bytes_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        Ok(())
    }

    fn flush(&mut self) {}

    fn read_target(&mut self) -> Result<FrameBuffer> {
        self.check_live()?;
        Ok(self.target.clone())
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture).is_some() {
            self.stats.lock().destroyed.push(texture);
        }
    }

    fn dispose(&mut self) {
        let mut stats = self.stats.lock();
        stats.dispose_calls += 1;
        if self.disposed {
            return;
        }
        for (handle, _) in self.textures.drain() {
            stats.destroyed.push(handle);
        }
        self.target = FrameBuffer::new(0, 0);
        self.disposed = true;
        debug!("software backend disposed");
    }
}
