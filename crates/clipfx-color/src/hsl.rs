//! RGB <-> HSL conversion and the color wheel adjustment.

use clipfx_core::ColorWheel;

/// Hue, saturation, lightness, all in `0..1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

/// Convert 8-bit-range RGB (`0..255`) to HSL.
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> Hsl {
    let r = r / 255.0;
    let g = g / 255.0;
    let b = b / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Convert HSL back to 8-bit-range RGB (`0..255`, unrounded).
pub fn hsl_to_rgb(hsl: Hsl) -> [f32; 3] {
    let Hsl { h, s, l } = hsl;
    if s == 0.0 {
        let v = l * 255.0;
        return [v, v, v];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_channel(p, q, h) * 255.0,
        hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0,
    ]
}

/// Rotate hue by `hue` degrees and offset saturation and lightness by percent.
pub fn apply_color_wheel(rgb: [f32; 3], wheel: &ColorWheel) -> [f32; 3] {
    let mut hsl = rgb_to_hsl(rgb[0], rgb[1], rgb[2]);
    hsl.h = (hsl.h + wheel.hue / 360.0).rem_euclid(1.0);
    hsl.s = (hsl.s + wheel.saturation / 100.0).clamp(0.0, 1.0);
    hsl.l = (hsl.l + wheel.lightness / 100.0).clamp(0.0, 1.0);
    hsl_to_rgb(hsl)
}
