//! ClipFx GPU - preview compositor
//!
//! Draws clips through a [`RenderBackend`]: [`WgpuBackend`] renders with the
//! WGSL clip shader, [`SoftwareBackend`] evaluates the same fragment stage on
//! the CPU. The [`Compositor`] owns the per-source texture cache and the
//! curve LUT texture on top of either.

pub mod backend;
pub mod compositor;
pub mod context;
pub mod shader;
pub mod software;
pub mod texture;
pub mod uniforms;
pub mod wgpu_backend;

pub use backend::{Quad, RenderBackend, TextureHandle, Vertex};
pub use compositor::{create_compositor, create_gpu_compositor, Compositor, TextureEntry};
pub use context::GpuContext;
pub use shader::clip_shader_source;
pub use software::{BackendStats, SoftwareBackend};
pub use texture::GpuTexture;
pub use uniforms::ClipUniforms;
pub use wgpu_backend::WgpuBackend;
