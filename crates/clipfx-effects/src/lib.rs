//! ClipFx Effects - CPU color correction, keying and diagnostics
//!
//! The CPU side of the engine: the fixed-order correction pipeline (sync and
//! async with external LUTs), chroma keying, the reference clip renderer used
//! for export, and histograms for scopes.

pub mod async_correct;
pub mod blur;
pub mod chroma_key;
pub mod compose;
pub mod histogram;
pub mod lut_loader;
pub mod pipeline;

pub use async_correct::AsyncCorrector;
pub use blur::{box_blur_cross, sample_blurred, sample_blurred_at};
pub use chroma_key::{extract_matte, key_alpha, key_pixel, ChromaKeyParams, KeyedPixel};
pub use compose::{apply_opacity, apply_wipe, render_clip_cpu};
pub use histogram::{compute_histogram, Histogram};
pub use lut_loader::{FsLutLoader, LutLoader};
pub use pipeline::{
    apply_color_correction, apply_color_correction_async, apply_lut, apply_plan, load_lut,
    CorrectionPlan,
};
