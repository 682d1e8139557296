//! CPU rendition of a full clip draw: blur, color stack, wipe and opacity.
//!
//! Produces what the compositor's fragment stage would write for a clip that
//! covers the whole frame, which makes it the export path's reference and the
//! baseline for GPU parity checks.

use rayon::prelude::*;

use clipfx_core::{ClipCompositing, ColorCorrectionProps, FrameBuffer, WipeRect};

use crate::blur::sample_blurred;
use crate::pipeline::{to_u8, CorrectionPlan};

/// Make every pixel whose center lies outside `wipe` fully transparent.
pub fn apply_wipe(frame: &mut FrameBuffer, wipe: &WipeRect) {
    let (w, h) = (frame.width as f32, frame.height as f32);
    if frame.pixel_count() == 0 {
        return;
    }
    let stride = frame.stride();
    frame
        .as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let v = (y as f32 + 0.5) / h;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let u = (x as f32 + 0.5) / w;
                if !wipe.contains(u, v) {
                    px.fill(0);
                }
            }
        });
}

/// Scale alpha by a global opacity.
pub fn apply_opacity(frame: &mut FrameBuffer, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity >= 1.0 {
        return;
    }
    for px in frame.as_bytes_mut().chunks_exact_mut(4) {
        px[3] = to_u8(px[3] as f32 * opacity);
    }
}

/// Render one clip on the CPU exactly as the compositor shades it.
pub fn render_clip_cpu(
    frame: &FrameBuffer,
    props: &ColorCorrectionProps,
    compositing: &ClipCompositing,
) -> FrameBuffer {
    let plan = CorrectionPlan::from_props(props);
    let opacity = compositing.opacity.clamp(0.0, 1.0);
    let mut out = FrameBuffer::new(frame.width, frame.height);
    if frame.pixel_count() == 0 {
        return out;
    }
    let stride = out.stride();
    out.as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let [r, g, b, a] = sample_blurred(frame, x as u32, y as u32, compositing.blur);
                let keyed = plan.shade([r, g, b]);
                let alpha = a * plan.output_alpha(&keyed) * opacity;
                px[0] = to_u8(keyed.rgb[0]);
                px[1] = to_u8(keyed.rgb[1]);
                px[2] = to_u8(keyed.rgb[2]);
                px[3] = to_u8(alpha);
            }
        });

    if let Some(wipe) = &compositing.wipe {
        apply_wipe(&mut out, wipe);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::apply_color_correction;
    use clipfx_core::{ColorWheel, WipeDirection};

    #[test]
    fn test_wipe_clears_outside() {
        let mut frame = FrameBuffer::filled(4, 2, [255, 255, 255, 255]);
        apply_wipe(&mut frame, &WipeRect::incoming(WipeDirection::Left, 0.5));
        assert_eq!(frame.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(frame.pixel(1, 1), [255, 255, 255, 255]);
        assert_eq!(frame.pixel(2, 0), [0, 0, 0, 0]);
        assert_eq!(frame.pixel(3, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_opacity_scales_alpha_only() {
        let mut frame = FrameBuffer::filled(1, 1, [10, 20, 30, 200]);
        apply_opacity(&mut frame, 0.5);
        assert_eq!(frame.pixel(0, 0), [10, 20, 30, 100]);
    }

    #[test]
    fn test_plain_clip_matches_color_correction() {
        let frame = FrameBuffer::gradient(32, 16);
        let props = ColorCorrectionProps {
            color_wheel: Some(ColorWheel {
                hue: 45.0,
                saturation: 10.0,
                lightness: -5.0,
            }),
            ..Default::default()
        };
        let rendered = render_clip_cpu(&frame, &props, &ClipCompositing::default());
        assert_eq!(rendered, apply_color_correction(&frame, &props));
    }

    #[test]
    fn test_opacity_and_wipe_combine() {
        let frame = FrameBuffer::filled(4, 4, [50, 60, 70, 255]);
        let compositing = ClipCompositing {
            opacity: 0.5,
            blur: 1.0,
            wipe: Some(WipeRect::incoming(WipeDirection::Down, 0.5)),
            ..Default::default()
        };
        let out = render_clip_cpu(&frame, &ColorCorrectionProps::default(), &compositing);
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(out.pixel(0, 3), [50, 60, 70, 128]);
    }
}
