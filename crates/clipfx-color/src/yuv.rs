//! YUV projection used for key color distance and luma.

use crate::formulas::{KEY_DISTANCE_SCALE, LUMA_WEIGHTS, YUV_U_WEIGHTS, YUV_V_WEIGHTS};

#[inline]
fn dot(w: [f32; 3], rgb: [f32; 3]) -> f32 {
    w[0] * rgb[0] + w[1] * rgb[1] + w[2] * rgb[2]
}

/// Project 8-bit-range RGB into YUV (same scale as the input).
#[inline]
pub fn rgb_to_yuv(rgb: [f32; 3]) -> [f32; 3] {
    [
        dot(LUMA_WEIGHTS, rgb),
        dot(YUV_U_WEIGHTS, rgb),
        dot(YUV_V_WEIGHTS, rgb),
    ]
}

/// Rec.601 luma of 8-bit-range RGB.
#[inline]
pub fn luma(rgb: [f32; 3]) -> f32 {
    dot(LUMA_WEIGHTS, rgb)
}

/// Euclidean distance between two YUV colors, normalized to the 8-bit range.
#[inline]
pub fn yuv_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dy = (a[0] - b[0]) / KEY_DISTANCE_SCALE;
    let du = (a[1] - b[1]) / KEY_DISTANCE_SCALE;
    let dv = (a[2] - b[2]) / KEY_DISTANCE_SCALE;
    (dy * dy + du * du + dv * dv).sqrt()
}
