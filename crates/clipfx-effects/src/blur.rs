//! Five-tap cross box blur, matching the compositor shader's sampling.

use rayon::prelude::*;

use clipfx_color::formulas::{BLUR_CENTER_WEIGHT, BLUR_WEIGHT_SUM};
use clipfx_core::FrameBuffer;

use crate::pipeline::to_u8;

/// Nearest texel for a continuous coordinate, clamped to the edge.
#[inline]
fn texel(coord: f32, size: u32) -> u32 {
    (coord.floor().max(0.0) as u32).min(size.saturating_sub(1))
}

#[inline]
fn fetch(frame: &FrameBuffer, x: f32, y: f32) -> [f32; 4] {
    let px = frame.pixel(texel(x, frame.width), texel(y, frame.height));
    [px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32]
}

/// Blurred RGBA (8-bit range, unrounded) at texel `(x, y)`.
///
/// Center weighs 4, the four neighbors `blur` texels away weigh 1 each.
/// `blur <= 0` returns the texel itself.
#[inline]
pub fn sample_blurred(frame: &FrameBuffer, x: u32, y: u32, blur: f32) -> [f32; 4] {
    sample_blurred_at(frame, x as f32 + 0.5, y as f32 + 0.5, blur)
}

/// Same as [`sample_blurred`] at a continuous texel-space position, with
/// nearest sampling of every tap.
pub fn sample_blurred_at(frame: &FrameBuffer, cx: f32, cy: f32, blur: f32) -> [f32; 4] {
    let center = fetch(frame, cx, cy);
    if blur <= 0.0 {
        return center;
    }
    let taps = [
        fetch(frame, cx - blur, cy),
        fetch(frame, cx + blur, cy),
        fetch(frame, cx, cy - blur),
        fetch(frame, cx, cy + blur),
    ];
    let mut out = [0.0f32; 4];
    for (c, o) in out.iter_mut().enumerate() {
        let neighbors: f32 = taps.iter().map(|t| t[c]).sum();
        *o = (center[c] * BLUR_CENTER_WEIGHT + neighbors) / BLUR_WEIGHT_SUM;
    }
    out
}

/// Blur a whole frame.
pub fn box_blur_cross(frame: &FrameBuffer, blur: f32) -> FrameBuffer {
    let mut out = frame.clone();
    if blur <= 0.0 || frame.pixel_count() == 0 {
        return out;
    }
    let stride = out.stride();
    out.as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let v = sample_blurred(frame, x as u32, y as u32, blur);
                for (dst, src) in px.iter_mut().zip(v) {
                    *dst = to_u8(src);
                }
            }
        });
    out
}
