//! Preview compositor: texture cache, curve LUT and per-clip draws.

use std::collections::HashMap;

use clipfx_color::CurveLuts;
use clipfx_core::config::BackendPreference;
use clipfx_core::{
    ClipCompositing, ClipFxError, ColorCorrectionProps, CompositorConfig, FrameBuffer,
    ImageSource, Rect, Result,
};
use clipfx_effects::CorrectionPlan;
use tracing::{debug, info, warn};

use crate::backend::{Quad, RenderBackend, TextureHandle};
use crate::software::SoftwareBackend;
use crate::uniforms::ClipUniforms;
use crate::wgpu_backend::WgpuBackend;

/// Cached texture for one clip source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureEntry {
    pub texture: TextureHandle,
    pub width: u32,
    pub height: u32,
    /// Whether pixels have been uploaded since the texture was created.
    pub initialized: bool,
    /// Version of the last upload, set only for immutable sources.
    pub last_version: Option<u64>,
}

/// Draws clips through a [`RenderBackend`].
///
/// Owns every texture it creates. [`Compositor::dispose`] releases them
/// explicitly; dropping the compositor does the same on any other path.
pub struct Compositor<B: RenderBackend> {
    backend: B,
    entries: HashMap<String, TextureEntry>,
    curve_lut: TextureHandle,
    /// Content key of the curves currently in `curve_lut`; `None` is identity.
    curve_key: Option<String>,
    released: bool,
}

impl<B: RenderBackend> Compositor<B> {
    /// Wrap `backend` and create the curve LUT texture.
    pub fn new(mut backend: B) -> Result<Self> {
        let curve_lut = backend.create_texture(256, 1, "Curve LUT")?;
        backend.upload(curve_lut, &CurveLuts::default().to_rgba_texels())?;
        info!(backend = backend.name(), "Compositor created");
        Ok(Self {
            backend,
            entries: HashMap::new(),
            curve_lut,
            curve_key: None,
            released: false,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn target_size(&self) -> (u32, u32) {
        self.backend.target_size()
    }

    pub fn entry(&self, source_id: &str) -> Option<&TextureEntry> {
        self.entries.get(source_id)
    }

    pub fn cached_sources(&self) -> usize {
        self.entries.len()
    }

    fn check_live(&self) -> Result<()> {
        if self.released {
            Err(ClipFxError::Gpu("Compositor has been disposed".to_string()))
        } else {
            Ok(())
        }
    }

    /// Clear the target at the start of a frame.
    pub fn begin_frame(&mut self, clear: [f32; 4]) -> Result<()> {
        self.check_live()?;
        self.backend.begin_frame(clear)
    }

    /// Look up or (re)create the texture for `source_id`.
    fn texture_for(&mut self, source_id: &str, width: u32, height: u32) -> Result<TextureEntry> {
        if let Some(entry) = self.entries.get(source_id) {
            if entry.width == width && entry.height == height {
                return Ok(*entry);
            }
            debug!(
                source_id,
                old = ?(entry.width, entry.height),
                new = ?(width, height),
                "Source size changed, recreating texture"
            );
            self.backend.destroy_texture(entry.texture);
            self.entries.remove(source_id);
        }

        let texture = self.backend.create_texture(width, height, source_id)?;
        let entry = TextureEntry {
            texture,
            width,
            height,
            initialized: false,
            last_version: None,
        };
        self.entries.insert(source_id.to_string(), entry);
        Ok(entry)
    }

    fn upload_source(&mut self, source_id: &str, source: &ImageSource<'_>) -> Result<TextureHandle> {
        let entry = self.texture_for(source_id, source.width, source.height)?;

        let unchanged = source.is_immutable()
            && entry.initialized
            && entry.last_version == source.version;
        if unchanged {
            debug!(source_id, version = ?source.version, "Texture cache hit");
            return Ok(entry.texture);
        }

        self.backend.upload(entry.texture, source.pixels)?;
        if let Some(e) = self.entries.get_mut(source_id) {
            e.initialized = true;
            e.last_version = if source.is_immutable() {
                source.version
            } else {
                None
            };
        }
        Ok(entry.texture)
    }

    /// Bring the curve LUT texture in line with `props`. Identity curves
    /// leave it alone since the shader skips the stage.
    fn sync_curve_lut(&mut self, props: &ColorCorrectionProps, plan: &CorrectionPlan) -> Result<()> {
        let (Some(luts), Some(curves)) = (&plan.curves, &props.curves) else {
            return Ok(());
        };
        let key = curves.content_key();
        if self.curve_key.as_deref() == Some(key.as_str()) {
            return Ok(());
        }
        self.backend.upload(self.curve_lut, &luts.to_rgba_texels())?;
        debug!("Curve LUT rebuilt");
        self.curve_key = Some(key);
        Ok(())
    }

    /// Draw one clip into the target.
    pub fn draw_clip(
        &mut self,
        source_id: &str,
        source: &ImageSource<'_>,
        props: &ColorCorrectionProps,
        compositing: &ClipCompositing,
    ) -> Result<()> {
        self.check_live()?;
        if !source.is_well_formed() {
            return Err(ClipFxError::InvalidParameter(format!(
                "source {} declares {}x{} but holds {} bytes",
                source_id,
                source.width,
                source.height,
                source.pixels.len()
            )));
        }

        let texture = self.upload_source(source_id, source)?;

        let plan = CorrectionPlan::from_props(props);
        self.sync_curve_lut(props, &plan)?;

        let target = self.backend.target_size();
        let uniforms = ClipUniforms::new(&plan, compositing, target, (source.width, source.height));
        let quad = Quad::new(compositing.dest.unwrap_or(Rect::full(target.0, target.1)));

        self.backend.set_uniforms(&uniforms);
        self.backend.draw(texture, self.curve_lut, &quad)
    }

    /// Release the cached texture of a source that left the timeline.
    pub fn remove_source(&mut self, source_id: &str) {
        if let Some(entry) = self.entries.remove(source_id) {
            self.backend.destroy_texture(entry.texture);
        }
    }

    /// Submit the frame's work without waiting for it.
    pub fn flush(&mut self) {
        if !self.released {
            self.backend.flush();
        }
    }

    pub fn read_target(&mut self) -> Result<FrameBuffer> {
        self.check_live()?;
        self.backend.read_target()
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let count = self.entries.len();
        for (_, entry) in self.entries.drain() {
            self.backend.destroy_texture(entry.texture);
        }
        self.backend.destroy_texture(self.curve_lut);
        self.backend.dispose();
        debug!(textures = count, "Compositor released");
    }

    /// Release every texture, the curve LUT and the backend.
    pub fn dispose(mut self) {
        self.release();
    }
}

impl<B: RenderBackend> Drop for Compositor<B> {
    fn drop(&mut self) {
        self.release();
    }
}

/// GPU compositor, or `None` when wgpu cannot be brought up. Callers fall
/// back to the CPU pipeline.
pub fn create_gpu_compositor(config: &CompositorConfig) -> Option<Compositor<WgpuBackend>> {
    match WgpuBackend::new(config).and_then(Compositor::new) {
        Ok(compositor) => Some(compositor),
        Err(e) => {
            warn!(error = %e, "GPU compositor unavailable, falling back to CPU rendering");
            None
        }
    }
}

/// Compositor with the backend `config.backend` asks for.
///
/// `Auto` prefers wgpu and falls back to the software backend; `Wgpu`
/// returns `None` when no GPU is usable.
pub fn create_compositor(
    config: &CompositorConfig,
) -> Option<Compositor<Box<dyn RenderBackend>>> {
    let software = || -> Box<dyn RenderBackend> {
        Box::new(SoftwareBackend::new(config.width, config.height))
    };

    let backend: Box<dyn RenderBackend> = match config.backend {
        BackendPreference::Software => software(),
        BackendPreference::Wgpu => match WgpuBackend::new(config) {
            Ok(b) => Box::new(b),
            Err(e) => {
                warn!(error = %e, "GPU compositor unavailable");
                return None;
            }
        },
        BackendPreference::Auto => match WgpuBackend::new(config) {
            Ok(b) => Box::new(b),
            Err(e) => {
                warn!(error = %e, "GPU unavailable, using software compositor");
                software()
            }
        },
    };

    match Compositor::new(backend) {
        Ok(c) => Some(c),
        Err(e) => {
            warn!(error = %e, "Failed to create compositor");
            None
        }
    }
}
