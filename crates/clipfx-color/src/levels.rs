//! Input/output levels with gamma.

use clipfx_core::Levels;

use crate::formulas::{LEVELS_MIN_GAMMA, LEVELS_MIN_RANGE};

/// Map one 8-bit-range channel value through levels. Result is in `0..255`.
#[inline]
pub fn levels_value(v: f32, levels: &Levels) -> f32 {
    let raw = levels.input_white - levels.input_black;
    // Inverted ranges stay inverted; only near-zero spans are widened.
    let range = if raw.abs() >= LEVELS_MIN_RANGE {
        raw
    } else if raw < 0.0 {
        -LEVELS_MIN_RANGE
    } else {
        LEVELS_MIN_RANGE
    };
    let normalized = ((v - levels.input_black) / range).clamp(0.0, 1.0);
    let curved = normalized.powf(1.0 / levels.gamma.max(LEVELS_MIN_GAMMA));
    (levels.output_black + curved * (levels.output_white - levels.output_black)).clamp(0.0, 255.0)
}

#[inline]
pub fn apply_levels(rgb: [f32; 3], levels: &Levels) -> [f32; 3] {
    [
        levels_value(rgb[0], levels),
        levels_value(rgb[1], levels),
        levels_value(rgb[2], levels),
    ]
}
