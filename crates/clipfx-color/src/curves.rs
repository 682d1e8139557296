//! Piecewise-linear tone curves baked into 256-entry lookup tables.

use clipfx_core::{CurvePoint, Curves};

/// Number of entries in a curve LUT.
pub const CURVE_LUT_SIZE: usize = 256;

/// 8-bit tone curve lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveLut([u8; CURVE_LUT_SIZE]);

impl Default for CurveLut {
    fn default() -> Self {
        Self::identity()
    }
}

/// Evaluate a curve whose points are sorted by `x`.
///
/// Inputs left of the first point or right of the last take that point's `y`.
pub fn eval_curve(sorted: &[CurvePoint], x: f32) -> f32 {
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return x;
    };
    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if x >= a.x && x <= b.x {
            let span = b.x - a.x;
            if span <= f32::EPSILON {
                return a.y;
            }
            let t = (x - a.x) / span;
            return a.y + t * (b.y - a.y);
        }
    }
    last.y
}

impl CurveLut {
    pub fn identity() -> Self {
        let mut table = [0u8; CURVE_LUT_SIZE];
        for (i, v) in table.iter_mut().enumerate() {
            *v = i as u8;
        }
        Self(table)
    }

    /// Build a LUT from control points in any order. No points gives the identity.
    pub fn build(points: &[CurvePoint]) -> Self {
        if points.is_empty() {
            return Self::identity();
        }
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut table = [0u8; CURVE_LUT_SIZE];
        for (i, v) in table.iter_mut().enumerate() {
            let x = i as f32 / 255.0;
            let y = eval_curve(&sorted, x);
            *v = (y * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        Self(table)
    }

    #[inline]
    pub fn apply(&self, v: u8) -> u8 {
        self.0[v as usize]
    }

    /// Look up an unrounded channel value.
    #[inline]
    pub fn apply_f32(&self, v: f32) -> f32 {
        self.0[v.round().clamp(0.0, 255.0) as usize] as f32
    }

    pub fn as_array(&self) -> &[u8; CURVE_LUT_SIZE] {
        &self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &v)| v as usize == i)
    }
}

/// Master plus per-channel LUTs for one clip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurveLuts {
    pub master: CurveLut,
    pub red: CurveLut,
    pub green: CurveLut,
    pub blue: CurveLut,
}

impl CurveLuts {
    pub fn from_curves(curves: &Curves) -> Self {
        Self {
            master: CurveLut::build(&curves.master),
            red: CurveLut::build(&curves.red),
            green: CurveLut::build(&curves.green),
            blue: CurveLut::build(&curves.blue),
        }
    }

    /// Master first, then each channel's own curve on the result.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        [
            self.red.apply_f32(self.master.apply_f32(rgb[0])),
            self.green.apply_f32(self.master.apply_f32(rgb[1])),
            self.blue.apply_f32(self.master.apply_f32(rgb[2])),
        ]
    }

    /// Pack into a 256x1 RGBA8 texture: R=red, G=green, B=blue, A=master.
    pub fn to_rgba_texels(&self) -> Vec<u8> {
        let mut texels = Vec::with_capacity(CURVE_LUT_SIZE * 4);
        for i in 0..CURVE_LUT_SIZE {
            texels.extend_from_slice(&[
                self.red.0[i],
                self.green.0[i],
                self.blue.0[i],
                self.master.0[i],
            ]);
        }
        texels
    }

    /// Inverse of [`CurveLuts::to_rgba_texels`]. Returns `None` on a short buffer.
    pub fn from_rgba_texels(texels: &[u8]) -> Option<Self> {
        if texels.len() < CURVE_LUT_SIZE * 4 {
            return None;
        }
        let mut luts = Self::default();
        for (i, px) in texels.chunks_exact(4).take(CURVE_LUT_SIZE).enumerate() {
            luts.red.0[i] = px[0];
            luts.green.0[i] = px[1];
            luts.blue.0[i] = px[2];
            luts.master.0[i] = px[3];
        }
        Some(luts)
    }
}
