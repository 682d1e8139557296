//! Chroma keying (green/blue screen) with spill suppression.

use clipfx_color::formulas::{
    SPILL_BLUE_SHIFT, SPILL_DISTANCE_FACTOR, SPILL_GAIN, SPILL_GREEN_SHIFT, SPILL_RATIO_THRESHOLD,
};
use clipfx_color::{hex_to_rgb, rgb_to_yuv, yuv_distance};
use clipfx_core::{ChromaKey, FrameBuffer};

/// Resolved chroma key parameters, percentages normalized to `0..1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaKeyParams {
    /// Key color in 8-bit-range RGB.
    pub key_rgb: [f32; 3],
    pub tolerance: f32,
    pub edge_softness: f32,
    pub spill_suppression: f32,
    pub show_mask: bool,
}

impl ChromaKeyParams {
    /// Resolve clip settings. Disabled keys resolve to `None`.
    pub fn from_props(key: &ChromaKey) -> Option<Self> {
        if !key.enabled {
            return None;
        }
        let [r, g, b] = hex_to_rgb(&key.color);
        Some(Self {
            key_rgb: [r as f32, g as f32, b as f32],
            tolerance: key.tolerance / 100.0,
            edge_softness: key.edge_softness / 100.0,
            spill_suppression: key.spill_suppression / 100.0,
            show_mask: key.show_mask,
        })
    }

    /// Green screen default.
    pub fn green_screen() -> Self {
        Self {
            key_rgb: [0.0, 255.0, 0.0],
            tolerance: 0.2,
            edge_softness: 0.1,
            spill_suppression: 0.5,
            show_mask: false,
        }
    }

    /// Blue screen default.
    pub fn blue_screen() -> Self {
        Self {
            key_rgb: [0.0, 0.0, 255.0],
            ..Self::green_screen()
        }
    }

    /// Green keys correct the green channel, everything else the blue one.
    #[inline]
    pub fn is_green_dominant(&self) -> bool {
        self.key_rgb[1] >= self.key_rgb[2]
    }
}

/// Result of keying one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyedPixel {
    /// Corrected color in 8-bit range, or the matte gray in mask mode.
    pub rgb: [f32; 3],
    /// Matte value: 0 keyed out, 1 opaque.
    pub alpha: f32,
}

/// Matte value for a normalized key distance.
#[inline]
pub fn key_alpha(distance: f32, tolerance: f32, edge_softness: f32) -> f32 {
    if distance < tolerance {
        0.0
    } else if distance < tolerance + edge_softness {
        (distance - tolerance) / edge_softness
    } else {
        1.0
    }
}

/// Key a single 8-bit-range pixel.
pub fn key_pixel(rgb: [f32; 3], params: &ChromaKeyParams) -> KeyedPixel {
    let distance = yuv_distance(rgb_to_yuv(rgb), rgb_to_yuv(params.key_rgb));
    let alpha = key_alpha(distance, params.tolerance, params.edge_softness);

    let mut out = rgb;
    if alpha < 1.0
        && params.spill_suppression > 0.0
        && distance < params.tolerance * SPILL_DISTANCE_FACTOR
    {
        let (channel, shift) = if params.is_green_dominant() {
            (1, SPILL_GREEN_SHIFT)
        } else {
            (2, SPILL_BLUE_SHIFT)
        };
        let ratio = rgb[channel] / (rgb[0] + rgb[1] + rgb[2] + 1.0);
        if ratio > SPILL_RATIO_THRESHOLD {
            let k = (1.0 - alpha)
                * params.spill_suppression
                * (ratio - SPILL_RATIO_THRESHOLD)
                * SPILL_GAIN;
            for (c, s) in out.iter_mut().zip(shift) {
                *c = (*c + s * k).clamp(0.0, 255.0);
            }
        }
    }

    if params.show_mask {
        let gray = 255.0 * (1.0 - alpha);
        out = [gray; 3];
    }

    KeyedPixel { rgb: out, alpha }
}

/// Extract the matte of a whole frame (one value per pixel).
pub fn extract_matte(frame: &FrameBuffer, params: &ChromaKeyParams) -> Vec<f32> {
    frame
        .pixels()
        .map(|px| key_pixel([px[0] as f32, px[1] as f32, px[2] as f32], params).alpha)
        .collect()
}
