//! CPU color correction pipeline.
//!
//! Stage order is fixed: levels, white balance, color wheel, curves, chroma
//! key. The asynchronous variant adds 3D LUT sampling after the chroma key.
//! Each pixel is carried in `f32` through every stage and rounded once.

use rayon::prelude::*;
use tracing::warn;

use clipfx_color::{
    apply_color_wheel, apply_levels, white_balance_multiplier, CurveLuts, Lut3D,
};
use clipfx_core::{ColorCorrectionProps, ColorWheel, FrameBuffer, Levels, Result};

use crate::chroma_key::{key_pixel, ChromaKeyParams, KeyedPixel};
use crate::lut_loader::LutLoader;

/// Color correction resolved once per frame: LUTs baked, hex parsed,
/// percentages normalized. Stages that would not change a pixel are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectionPlan {
    pub levels: Option<Levels>,
    pub white_balance: Option<[f32; 3]>,
    pub color_wheel: Option<ColorWheel>,
    pub curves: Option<CurveLuts>,
    pub chroma_key: Option<ChromaKeyParams>,
}

impl CorrectionPlan {
    pub fn from_props(props: &ColorCorrectionProps) -> Self {
        let curves = props
            .curves
            .as_ref()
            .filter(|c| !c.is_identity())
            .map(CurveLuts::from_curves)
            .filter(|luts| *luts != CurveLuts::default());

        Self {
            levels: props.levels.filter(|l| !l.is_identity()),
            white_balance: props
                .white_balance
                .as_ref()
                .map(white_balance_multiplier)
                .filter(|m| *m != [1.0; 3]),
            color_wheel: props.color_wheel.filter(|w| !w.is_identity()),
            curves,
            chroma_key: props
                .chroma_key
                .as_ref()
                .and_then(ChromaKeyParams::from_props),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Mask mode replaces color with the matte and leaves alpha opaque.
    #[inline]
    pub fn shows_mask(&self) -> bool {
        self.chroma_key.map_or(false, |k| k.show_mask)
    }

    /// Run every stage on one 8-bit-range pixel.
    #[inline]
    pub fn shade(&self, rgb: [f32; 3]) -> KeyedPixel {
        let mut c = rgb;
        if let Some(levels) = &self.levels {
            c = apply_levels(c, levels);
        }
        if let Some(m) = self.white_balance {
            c = [
                (c[0] * m[0]).clamp(0.0, 255.0),
                (c[1] * m[1]).clamp(0.0, 255.0),
                (c[2] * m[2]).clamp(0.0, 255.0),
            ];
        }
        if let Some(wheel) = &self.color_wheel {
            c = apply_color_wheel(c, wheel);
        }
        if let Some(curves) = &self.curves {
            c = curves.apply(c);
        }
        match &self.chroma_key {
            Some(key) => key_pixel(c, key),
            None => KeyedPixel { rgb: c, alpha: 1.0 },
        }
    }

    /// Alpha multiplier the key contributes to the output pixel.
    #[inline]
    pub fn output_alpha(&self, keyed: &KeyedPixel) -> f32 {
        if self.shows_mask() {
            1.0
        } else {
            keyed.alpha
        }
    }
}

#[inline]
pub(crate) fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Apply a resolved plan to a frame, returning a new frame.
pub fn apply_plan(frame: &FrameBuffer, plan: &CorrectionPlan) -> FrameBuffer {
    let mut out = frame.clone();
    if plan.is_identity() || frame.pixel_count() == 0 {
        return out;
    }
    let stride = out.stride();
    out.as_bytes_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let keyed = plan.shade([px[0] as f32, px[1] as f32, px[2] as f32]);
            let alpha = plan.output_alpha(&keyed);
            px[0] = to_u8(keyed.rgb[0]);
            px[1] = to_u8(keyed.rgb[1]);
            px[2] = to_u8(keyed.rgb[2]);
            px[3] = to_u8(px[3] as f32 * alpha);
        }
    });
    out
}

/// Synchronous color correction (no LUT stage).
pub fn apply_color_correction(frame: &FrameBuffer, props: &ColorCorrectionProps) -> FrameBuffer {
    apply_plan(frame, &CorrectionPlan::from_props(props))
}

/// Sample a 3D LUT into every pixel's color. Alpha is untouched.
pub fn apply_lut(frame: &mut FrameBuffer, lut: &Lut3D) {
    if frame.pixel_count() == 0 {
        return;
    }
    let stride = frame.stride();
    frame.as_bytes_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let [r, g, b] = lut.apply_rgb8([px[0], px[1], px[2]]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    });
}

/// Fetch and decode a LUT through `loader`.
pub async fn load_lut<L: LutLoader + ?Sized>(loader: &L, url: &str) -> Result<Lut3D> {
    let bytes = loader.load(url).await?;
    Ok(Lut3D::decode(&bytes, url)?)
}

/// Color correction including the external LUT stage.
///
/// A LUT that cannot be loaded or decoded is skipped and the rest of the
/// correction is still returned.
pub async fn apply_color_correction_async<L: LutLoader + ?Sized>(
    frame: &FrameBuffer,
    props: &ColorCorrectionProps,
    loader: &L,
) -> FrameBuffer {
    let mut out = apply_color_correction(frame, props);
    let Some(url) = props.lut_url.as_deref() else {
        return out;
    };
    match load_lut(loader, url).await {
        Ok(lut) => apply_lut(&mut out, &lut),
        Err(e) => warn!(url, error = %e, "Skipping LUT stage"),
    }
    out
}
