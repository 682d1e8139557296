//! Color temperature and tint to per-channel multipliers.

use clipfx_core::WhiteBalance;

use crate::formulas::{NEUTRAL_TEMPERATURE, TINT_RANGE, TINT_WEIGHTS, WARM_BLUE, WARM_GREEN};

/// Approximate RGB multipliers for a color temperature (Kelvin) and tint.
///
/// Below 6500 K red is pinned at 1 and green/blue follow a logarithmic fit.
/// At or above 6500 K blue is pinned at 1 and red/green fall off with the
/// same coefficients. No returned multiplier exceeds 1.0.
pub fn temperature_to_rgb(temperature: f32, tint: f32) -> [f32; 3] {
    let mut rgb = if temperature < NEUTRAL_TEMPERATURE {
        let t = (temperature.max(1.0) / 100.0).ln();
        [
            1.0,
            WARM_GREEN[0] * t + WARM_GREEN[1],
            WARM_BLUE[0] * t + WARM_BLUE[1],
        ]
    } else {
        let t = (temperature / NEUTRAL_TEMPERATURE).ln();
        [1.0 - WARM_BLUE[0] * t, 1.0 - WARM_GREEN[0] * t, 1.0]
    };

    let bias = tint / TINT_RANGE;
    for (c, w) in rgb.iter_mut().zip(TINT_WEIGHTS) {
        *c = (*c + bias * w).max(0.0);
    }

    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    if max > 1.0 {
        for c in &mut rgb {
            *c /= max;
        }
    }
    rgb
}

/// Multipliers for a clip's white balance settings.
#[inline]
pub fn white_balance_multiplier(wb: &WhiteBalance) -> [f32; 3] {
    temperature_to_rgb(wb.temperature, wb.tint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_neutral_is_white() {
        assert_eq!(temperature_to_rgb(6500.0, 0.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_cool_side_reduces_red_most() {
        let [r, g, b] = temperature_to_rgb(8000.0, 0.0);
        assert_eq!(b, 1.0);
        assert!(r < g && g < 1.0);
    }

    #[test]
    fn test_warm_side_keeps_red_pinned_before_normalization() {
        let [r, g, b] = temperature_to_rgb(2000.0, 0.0);
        assert_eq!(r, 1.0);
        assert!(g < 1.0 && b < 1.0);
    }

    #[test]
    fn test_positive_tint_pushes_red() {
        let neutral = temperature_to_rgb(7000.0, 0.0);
        let tinted = temperature_to_rgb(7000.0, 150.0);
        assert!(tinted[0] > neutral[0]);
        assert!(tinted[2] < neutral[2]);
    }

    proptest! {
        #[test]
        fn prop_multiplier_never_exceeds_one(t in 2000.0f32..=8000.0, tint in -150.0f32..=150.0) {
            let rgb = temperature_to_rgb(t, tint);
            for c in rgb {
                prop_assert!(c <= 1.0, "{:?} for t={} tint={}", rgb, t, tint);
                prop_assert!(c >= 0.0);
            }
        }
    }
}
