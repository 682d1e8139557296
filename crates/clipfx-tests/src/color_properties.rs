//! Color pipeline properties, driven from clip JSON the way a host sends it.

use clipfx_color::{apply_color_wheel, hsl_to_rgb, rgb_to_hsl, temperature_to_rgb, CurveLut, CurveLuts};
use clipfx_core::{ColorCorrectionProps, CurvePoint, FrameBuffer};
use clipfx_effects::{apply_color_correction, compute_histogram, CorrectionPlan};
use proptest::prelude::*;

fn props(json: &str) -> ColorCorrectionProps {
    serde_json::from_str(json).unwrap()
}

#[test]
fn green_screen_json_keys_out_green_buffer() {
    let props = props(
        r##"{"chromaKey": {"enabled": true, "color": "#00ff00", "tolerance": 10,
             "edgeSoftness": 5, "spillSuppression": 0, "showMask": false}}"##,
    );
    let frame = FrameBuffer::filled(2, 2, [0, 255, 0, 255]);
    let out = apply_color_correction(&frame, &props);
    assert_eq!((out.width, out.height), (2, 2));
    assert!(out.pixels().all(|p| p[3] == 0));
}

#[test]
fn identity_levels_json_is_noop() {
    let props = props(
        r#"{"levels": {"inputBlack": 0, "inputWhite": 255, "outputBlack": 0,
             "outputWhite": 255, "gamma": 1}}"#,
    );
    assert!(CorrectionPlan::from_props(&props).is_identity());
    let frame = FrameBuffer::gradient(64, 32);
    assert_eq!(apply_color_correction(&frame, &props), frame);
}

#[test]
fn empty_props_is_noop() {
    let frame = FrameBuffer::test_pattern(16, 16);
    assert_eq!(apply_color_correction(&frame, &props("{}")), frame);
}

#[test]
fn hue_rotation_and_curves_do_not_commute() {
    let wheel = props(r#"{"colorWheel": {"hue": 180, "saturation": 0, "lightness": 0}}"#)
        .color_wheel
        .unwrap();
    let luts = CurveLuts {
        red: CurveLut::build(&[CurvePoint::new(0.0, 0.5), CurvePoint::new(1.0, 1.0)]),
        ..Default::default()
    };

    let px = [200.0, 60.0, 40.0];
    let wheel_then_curves = luts.apply(apply_color_wheel(px, &wheel));
    let curves_then_wheel = apply_color_wheel(luts.apply(px), &wheel);
    let rounded = |c: [f32; 3]| c.map(|v| v.round() as i32);
    assert_ne!(rounded(wheel_then_curves), rounded(curves_then_wheel));
}

#[test]
fn diagonal_curve_is_identity_table() {
    let lut = CurveLut::build(&[CurvePoint::new(1.0, 1.0), CurvePoint::new(0.0, 0.0)]);
    for i in 0..=255u8 {
        assert_eq!(lut.apply(i), i);
    }
}

#[test]
fn histogram_of_corrected_frame_counts_every_pixel() {
    let props = props(r#"{"whiteBalance": {"temperature": 3200, "tint": 0}}"#);
    let out = apply_color_correction(&FrameBuffer::gradient(40, 30), &props);
    assert_eq!(compute_histogram(&out).total(), 1200);
}

#[test]
fn hsl_round_trip_coarse_grid() {
    for r in (0..=255).step_by(5) {
        for g in (0..=255).step_by(5) {
            for b in (0..=255).step_by(5) {
                let out = hsl_to_rgb(rgb_to_hsl(r as f32, g as f32, b as f32));
                for (o, i) in out.iter().zip([r, g, b]) {
                    assert!((o.round() as i32 - i).abs() <= 1, "({}, {}, {})", r, g, b);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn white_balance_never_amplifies(t in 2000.0f32..=8000.0, tint in -150.0f32..=150.0) {
        for m in temperature_to_rgb(t, tint) {
            prop_assert!(m <= 1.0);
            prop_assert!(m >= 0.0);
        }
    }

    #[test]
    fn identity_levels_on_random_buffers(
        pixels in proptest::collection::vec(any::<u8>(), 4 * 12)
    ) {
        let frame = FrameBuffer::from_raw(4, 3, pixels).unwrap();
        let props = props(r#"{"levels": {"inputBlack": 0, "inputWhite": 255,
            "outputBlack": 0, "outputWhite": 255, "gamma": 1}}"#);
        prop_assert_eq!(apply_color_correction(&frame, &props), frame);
    }
}
