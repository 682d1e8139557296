//! ClipFx Color — color math shared by the CPU pipeline and the GPU shader.

pub mod curves;
pub mod error;
pub mod formulas;
pub mod hex;
pub mod hsl;
pub mod levels;
pub mod lut;
pub mod white_balance;
pub mod yuv;

pub use curves::{eval_curve, CurveLut, CurveLuts, CURVE_LUT_SIZE};
pub use error::ColorError;
pub use formulas::wgsl_prelude;
pub use hex::{hex_to_rgb, rgb_to_hex};
pub use hsl::{apply_color_wheel, hsl_to_rgb, rgb_to_hsl, Hsl};
pub use levels::{apply_levels, levels_value};
pub use lut::{CubeLut, ImageLut, Lut3D};
pub use white_balance::{temperature_to_rgb, white_balance_multiplier};
pub use yuv::{luma, rgb_to_yuv, yuv_distance};
