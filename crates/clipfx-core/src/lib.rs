//! ClipFx Core - Foundation types for the compositing engine
//!
//! This crate provides the types shared by the CPU and GPU paths:
//! - RGBA8 frame buffers and decoded image sources
//! - Per-clip color correction and compositing parameters
//! - Geometric primitives and wipe masks
//! - Errors, configuration and logging setup

pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod logging;
pub mod props;
pub mod source;

pub use config::{BackendPreference, CompositorConfig, EngineConfig, LoggingConfig, LutConfig};
pub use error::{ClipFxError, Result};
pub use frame::{FrameBuffer, BYTES_PER_PIXEL};
pub use geometry::{Rect, Vec2, WipeDirection, WipeRect};
pub use props::{
    ChromaKey, ClipCompositing, ColorCorrectionProps, ColorWheel, CurvePoint, Curves, Levels,
    WhiteBalance,
};
pub use source::{ImageSource, SourceKind};
