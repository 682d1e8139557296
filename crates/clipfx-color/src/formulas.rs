//! Numeric constants shared by the CPU pipeline and the compositor shader.
//!
//! The CPU code reads these directly. The GPU shader never spells a constant
//! out: [`wgsl_prelude`] emits them as WGSL `const` declarations that are
//! prepended to the shader source, so both paths compile from one table.

use std::fmt::Write;

/// Rec.601 luma weights (also the Y row of the YUV projection).
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];
/// U row of the YUV projection.
pub const YUV_U_WEIGHTS: [f32; 3] = [-0.14713, -0.28886, 0.436];
/// V row of the YUV projection.
pub const YUV_V_WEIGHTS: [f32; 3] = [0.615, -0.51499, -0.10001];

/// Key distances are measured on YUV differences divided by this.
pub const KEY_DISTANCE_SCALE: f32 = 255.0;

/// Spill suppression only runs within `tolerance * SPILL_DISTANCE_FACTOR`.
pub const SPILL_DISTANCE_FACTOR: f32 = 1.5;
/// Dominant-channel share above which spill is corrected.
pub const SPILL_RATIO_THRESHOLD: f32 = 0.4;
pub const SPILL_GAIN: f32 = 2.0;
/// Per-channel shift (8-bit code values) applied per unit of spill on green keys.
pub const SPILL_GREEN_SHIFT: [f32; 3] = [20.0, -30.0, 10.0];
/// Per-channel shift (8-bit code values) applied per unit of spill on blue keys.
pub const SPILL_BLUE_SHIFT: [f32; 3] = [10.0, 10.0, -30.0];

/// Box blur: center tap weight and total weight of the 5-tap cross.
pub const BLUR_CENTER_WEIGHT: f32 = 4.0;
pub const BLUR_WEIGHT_SUM: f32 = 8.0;

/// Floors applied to levels so degenerate ranges stay finite.
pub const LEVELS_MIN_RANGE: f32 = 1.0;
pub const LEVELS_MIN_GAMMA: f32 = 0.01;

/// Temperature at which white balance is neutral.
pub const NEUTRAL_TEMPERATURE: f32 = 6500.0;
/// `a * ln(T / 100) + b` for the warm-side green channel.
pub const WARM_GREEN: [f32; 2] = [0.39, -0.5];
/// `a * ln(T / 100) + b` for the warm-side blue channel.
pub const WARM_BLUE: [f32; 2] = [0.543, -0.8];
pub const TINT_RANGE: f32 = 150.0;
pub const TINT_WEIGHTS: [f32; 3] = [0.1, -0.05, -0.1];

enum Value {
    Scalar(f32),
    Vec3([f32; 3]),
}

fn shader_constants() -> Vec<(&'static str, Value)> {
    use Value::*;
    vec![
        ("LUMA_WEIGHTS", Vec3(LUMA_WEIGHTS)),
        ("YUV_U_WEIGHTS", Vec3(YUV_U_WEIGHTS)),
        ("YUV_V_WEIGHTS", Vec3(YUV_V_WEIGHTS)),
        ("KEY_DISTANCE_SCALE", Scalar(KEY_DISTANCE_SCALE)),
        ("SPILL_DISTANCE_FACTOR", Scalar(SPILL_DISTANCE_FACTOR)),
        ("SPILL_RATIO_THRESHOLD", Scalar(SPILL_RATIO_THRESHOLD)),
        ("SPILL_GAIN", Scalar(SPILL_GAIN)),
        ("SPILL_GREEN_SHIFT", Vec3(SPILL_GREEN_SHIFT)),
        ("SPILL_BLUE_SHIFT", Vec3(SPILL_BLUE_SHIFT)),
        ("BLUR_CENTER_WEIGHT", Scalar(BLUR_CENTER_WEIGHT)),
        ("BLUR_WEIGHT_SUM", Scalar(BLUR_WEIGHT_SUM)),
        ("LEVELS_MIN_RANGE", Scalar(LEVELS_MIN_RANGE)),
        ("LEVELS_MIN_GAMMA", Scalar(LEVELS_MIN_GAMMA)),
    ]
}

/// Format an `f32` as a WGSL float literal.
fn wgsl_float(v: f32) -> String {
    let s = format!("{:?}", v);
    if s.contains('.') || s.contains('e') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// WGSL `const` declarations for every shared constant.
pub fn wgsl_prelude() -> String {
    let mut out = String::from("// Generated from clipfx_color::formulas.\n");
    for (name, value) in shader_constants() {
        // Writing into a String cannot fail.
        let _ = match value {
            Value::Scalar(v) => writeln!(out, "const {}: f32 = {};", name, wgsl_float(v)),
            Value::Vec3([x, y, z]) => writeln!(
                out,
                "const {}: vec3<f32> = vec3<f32>({}, {}, {});",
                name,
                wgsl_float(x),
                wgsl_float(y),
                wgsl_float(z)
            ),
        };
    }
    out
}
