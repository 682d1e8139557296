//! 3D lookup tables: cube layouts packed into images, and .cube text files.

use std::path::Path;

use crate::error::ColorError;

/// 3D LUT stored as an RGBA image whose pixels, read row-major, hold an
/// `n x n x n` cube with red varying fastest.
///
/// The edge length is the cube root of the pixel count. Colors whose
/// flattened index falls outside the image are passed through unchanged.
#[derive(Debug, Clone)]
pub struct ImageLut {
    pub width: u32,
    pub height: u32,
    /// Cube edge length.
    pub size: usize,
    pixels: Vec<u8>,
}

impl ImageLut {
    /// Build from tightly packed RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ColorError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ColorError::DimensionMismatch {
                expected,
                got: pixels.len(),
            });
        }
        let count = width as f64 * height as f64;
        let size = count.cbrt().round() as usize;
        Ok(Self {
            width,
            height,
            size,
            pixels,
        })
    }

    /// Decode an encoded image (PNG, JPEG).
    pub fn decode(bytes: &[u8]) -> Result<Self, ColorError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| ColorError::Decode(e.to_string()))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        Self::from_rgba(w, h, img.into_raw())
    }

    /// Look up an 8-bit color. `None` when the cube index is out of range.
    pub fn sample(&self, rgb: [u8; 3]) -> Option<[u8; 3]> {
        if self.size < 2 {
            return None;
        }
        let n = self.size;
        let scale = (n - 1) as f32 / 255.0;
        let q = |v: u8| (v as f32 * scale).round() as usize;
        let index = q(rgb[2]) * n * n + q(rgb[1]) * n + q(rgb[0]);
        let offset = index.checked_mul(4)?;
        let px = self.pixels.get(offset..offset + 3)?;
        Some([px[0], px[1], px[2]])
    }

    #[inline]
    pub fn apply(&self, rgb: [u8; 3]) -> [u8; 3] {
        self.sample(rgb).unwrap_or(rgb)
    }
}

/// 3D LUT parsed from an Adobe .cube file, applied with trilinear interpolation.
#[derive(Debug, Clone)]
pub struct CubeLut {
    pub size: usize,
    pub data: Vec<[f32; 3]>,
    pub domain_min: [f32; 3],
    pub domain_max: [f32; 3],
}

fn parse_triplet(rest: &str) -> Option<[f32; 3]> {
    let vals: Vec<f32> = rest
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    (vals.len() == 3).then(|| [vals[0], vals[1], vals[2]])
}

impl CubeLut {
    /// Parse a .cube file containing a 3D LUT.
    pub fn from_cube(content: &str) -> Result<Self, ColorError> {
        let mut size = 0usize;
        let mut data = Vec::new();
        let mut domain_min = [0.0f32; 3];
        let mut domain_max = [1.0f32; 3];

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("TITLE") {
                continue;
            }
            if let Some(rest) = line.strip_prefix("LUT_3D_SIZE") {
                size = rest
                    .trim()
                    .parse()
                    .map_err(|e| ColorError::Parse(format!("bad LUT_3D_SIZE: {}", e)))?;
                continue;
            }
            if let Some(rest) = line.strip_prefix("DOMAIN_MIN") {
                if let Some(v) = parse_triplet(rest) {
                    domain_min = v;
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix("DOMAIN_MAX") {
                if let Some(v) = parse_triplet(rest) {
                    domain_max = v;
                }
                continue;
            }
            if line.starts_with("LUT_1D_SIZE") {
                return Err(ColorError::InvalidLut("expected 3D LUT, got 1D".into()));
            }
            if let Some(v) = parse_triplet(line) {
                data.push(v);
            }
        }

        if size < 2 {
            return Err(ColorError::InvalidLut("missing or too small LUT_3D_SIZE".into()));
        }
        let expected = size
            .checked_mul(size)
            .and_then(|s| s.checked_mul(size))
            .ok_or_else(|| ColorError::InvalidLut(format!("LUT_3D_SIZE {} is too large", size)))?;
        if data.len() != expected {
            return Err(ColorError::DimensionMismatch {
                expected,
                got: data.len(),
            });
        }

        Ok(Self {
            size,
            data,
            domain_min,
            domain_max,
        })
    }

    /// Apply to a normalized RGB triplet.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let s = self.size;
        let n = (s - 1) as f32;

        let mut coords = [0.0f32; 3];
        for c in 0..3 {
            let range = self.domain_max[c] - self.domain_min[c];
            let t = if range.abs() < 1e-10 {
                0.0
            } else {
                ((rgb[c] - self.domain_min[c]) / range).clamp(0.0, 1.0)
            };
            coords[c] = t * n;
        }

        let r0 = (coords[0] as usize).min(s - 2);
        let g0 = (coords[1] as usize).min(s - 2);
        let b0 = (coords[2] as usize).min(s - 2);
        let fr = coords[0] - r0 as f32;
        let fg = coords[1] - g0 as f32;
        let fb = coords[2] - b0 as f32;

        let at = |r: usize, g: usize, b: usize| self.data[r + g * s + b * s * s];
        let lerp = |a: [f32; 3], b: [f32; 3], t: f32| {
            [
                a[0] + (b[0] - a[0]) * t,
                a[1] + (b[1] - a[1]) * t,
                a[2] + (b[2] - a[2]) * t,
            ]
        };

        let c00 = lerp(at(r0, g0, b0), at(r0 + 1, g0, b0), fr);
        let c10 = lerp(at(r0, g0 + 1, b0), at(r0 + 1, g0 + 1, b0), fr);
        let c01 = lerp(at(r0, g0, b0 + 1), at(r0 + 1, g0, b0 + 1), fr);
        let c11 = lerp(at(r0, g0 + 1, b0 + 1), at(r0 + 1, g0 + 1, b0 + 1), fr);
        lerp(lerp(c00, c10, fg), lerp(c01, c11, fg), fb)
    }

    /// Apply to an 8-bit color.
    pub fn apply_rgb8(&self, rgb: [u8; 3]) -> [u8; 3] {
        let out = self.apply([
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        ]);
        out.map(|v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
    }
}

/// Any 3D LUT the async pipeline can sample.
#[derive(Debug, Clone)]
pub enum Lut3D {
    Image(ImageLut),
    Cube(CubeLut),
}

impl Lut3D {
    /// Decode LUT bytes. Names ending in `.cube` are parsed as text, anything
    /// else is decoded as an image.
    pub fn decode(bytes: &[u8], name: &str) -> Result<Self, ColorError> {
        let is_cube = Path::new(name.split(['?', '#']).next().unwrap_or(name))
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("cube"));
        if is_cube {
            let text = std::str::from_utf8(bytes).map_err(|e| ColorError::Parse(e.to_string()))?;
            Ok(Self::Cube(CubeLut::from_cube(text)?))
        } else {
            Ok(Self::Image(ImageLut::decode(bytes)?))
        }
    }

    #[inline]
    pub fn apply_rgb8(&self, rgb: [u8; 3]) -> [u8; 3] {
        match self {
            Self::Image(lut) => lut.apply(rgb),
            Self::Cube(lut) => lut.apply_rgb8(rgb),
        }
    }
}
