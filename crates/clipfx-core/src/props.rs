//! Per-clip color correction and compositing parameters.
//!
//! These types mirror the JSON the clip model stores, so field names are
//! camelCase on the wire. Every sub-structure is optional; a missing one means
//! the stage does nothing.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, WipeRect};

/// Full color correction stack for one clip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorCorrectionProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_wheel: Option<ColorWheel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curves: Option<Curves>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<Levels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_balance: Option<WhiteBalance>,
    /// External 3-D LUT image. Only the asynchronous CPU path samples it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lut_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chroma_key: Option<ChromaKey>,
}

impl ColorCorrectionProps {
    /// True when no stage would change a pixel.
    pub fn is_identity(&self) -> bool {
        self.color_wheel.as_ref().map_or(true, ColorWheel::is_identity)
            && self.curves.as_ref().map_or(true, Curves::is_identity)
            && self.levels.as_ref().map_or(true, Levels::is_identity)
            && self.white_balance.is_none()
            && self.lut_url.is_none()
            && self.chroma_key.as_ref().map_or(true, |k| !k.enabled)
    }
}

/// Hue rotation in degrees, saturation and lightness offsets in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorWheel {
    /// -180..180
    pub hue: f32,
    /// -100..100
    pub saturation: f32,
    /// -100..100
    pub lightness: f32,
}

impl ColorWheel {
    pub fn is_identity(&self) -> bool {
        self.hue == 0.0 && self.saturation == 0.0 && self.lightness == 0.0
    }
}

/// Control point of a tone curve, both axes in `0..1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

impl CurvePoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Master and per-channel tone curves. An empty channel is the identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Curves {
    pub master: Vec<CurvePoint>,
    pub red: Vec<CurvePoint>,
    pub green: Vec<CurvePoint>,
    pub blue: Vec<CurvePoint>,
}

impl Curves {
    pub fn is_identity(&self) -> bool {
        self.master.is_empty() && self.red.is_empty() && self.green.is_empty() && self.blue.is_empty()
    }

    /// Key identifying the curve definition, used to memoize LUT builds.
    pub fn content_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Input/output levels with gamma. Ranges are in 8-bit code values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Levels {
    pub input_black: f32,
    pub input_white: f32,
    pub output_black: f32,
    pub output_white: f32,
    pub gamma: f32,
}

impl Default for Levels {
    fn default() -> Self {
        Self {
            input_black: 0.0,
            input_white: 255.0,
            output_black: 0.0,
            output_white: 255.0,
            gamma: 1.0,
        }
    }
}

impl Levels {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Color temperature in Kelvin plus a green/magenta tint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteBalance {
    /// 2000..8000 K
    pub temperature: f32,
    /// -150..150
    pub tint: f32,
}

impl Default for WhiteBalance {
    fn default() -> Self {
        Self {
            temperature: 6500.0,
            tint: 0.0,
        }
    }
}

/// Chroma key settings as stored on the clip. Percentages are `0..100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChromaKey {
    pub enabled: bool,
    /// `#RRGGBB`
    pub color: String,
    pub tolerance: f32,
    pub edge_softness: f32,
    pub spill_suppression: f32,
    pub show_mask: bool,
}

impl Default for ChromaKey {
    fn default() -> Self {
        Self {
            enabled: false,
            color: "#00ff00".to_string(),
            tolerance: 20.0,
            edge_softness: 10.0,
            spill_suppression: 50.0,
            show_mask: false,
        }
    }
}

/// How a clip is blended into the frame, independent of its color stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClipCompositing {
    /// Global clip opacity, `0..1`.
    pub opacity: f32,
    /// Box blur radius in texels; 0 disables it.
    pub blur: f32,
    /// Wipe transition mask.
    pub wipe: Option<WipeRect>,
    /// Destination rectangle in target pixels. `None` covers the whole target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest: Option<Rect>,
}

impl Default for ClipCompositing {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blur: 0.0,
            wipe: None,
            dest: None,
        }
    }
}
