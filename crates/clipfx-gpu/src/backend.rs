//! Renderer abstraction the compositor draws through.

use bytemuck::{Pod, Zeroable};
use clipfx_core::{FrameBuffer, Rect, Result, Vec2};

use crate::uniforms::ClipUniforms;

/// Opaque handle to a backend-owned texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Quad vertex: clip-space position plus source texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Destination rectangle of a draw, in target pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub dest: Rect,
}

impl Quad {
    pub fn new(dest: Rect) -> Self {
        Self { dest }
    }

    /// Two triangles covering `dest` on a `target_width` x `target_height`
    /// surface. UV (0,0) is the source's top-left texel.
    pub fn vertices(&self, target_width: u32, target_height: u32) -> [Vertex; 6] {
        let target = Vec2::new(target_width as f32, target_height as f32);
        let min = self.dest.min();
        let max = self.dest.max();
        let corner = |x: f32, y: f32, u: f32, v: f32| Vertex {
            position: Rect::to_ndc(Vec2::new(x, y), target).to_array(),
            uv: [u, v],
        };
        let tl = corner(min.x, min.y, 0.0, 0.0);
        let tr = corner(max.x, min.y, 1.0, 0.0);
        let bl = corner(min.x, max.y, 0.0, 1.0);
        let br = corner(max.x, max.y, 1.0, 1.0);
        [tl, bl, tr, tr, bl, br]
    }
}

/// A renderer that can host the clip shader.
///
/// Draw state is set in two steps: [`RenderBackend::set_uniforms`] stores
/// the parameter block, [`RenderBackend::draw`] consumes it together with the
/// source texture, the curve LUT texture and the destination quad.
pub trait RenderBackend {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Render target size in pixels.
    fn target_size(&self) -> (u32, u32);

    fn create_texture(&mut self, width: u32, height: u32, label: &str) -> Result<TextureHandle>;

    /// Replace the full contents of `texture` with tightly packed RGBA8.
    fn upload(&mut self, texture: TextureHandle, pixels: &[u8]) -> Result<()>;

    fn set_uniforms(&mut self, uniforms: &ClipUniforms);

    fn draw(&mut self, texture: TextureHandle, lut: TextureHandle, quad: &Quad) -> Result<()>;

    /// Clear the render target to `clear` (RGBA, `0..1`).
    fn begin_frame(&mut self, clear: [f32; 4]) -> Result<()>;

    /// Hand queued work to the device without waiting for it.
    fn flush(&mut self);

    /// Read the render target back as straight RGBA8.
    fn read_target(&mut self) -> Result<FrameBuffer>;

    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Release the target and every remaining backend resource.
    fn dispose(&mut self);
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn target_size(&self) -> (u32, u32) {
        (**self).target_size()
    }

    fn create_texture(&mut self, width: u32, height: u32, label: &str) -> Result<TextureHandle> {
        (**self).create_texture(width, height, label)
    }

    fn upload(&mut self, texture: TextureHandle, pixels: &[u8]) -> Result<()> {
        (**self).upload(texture, pixels)
    }

    fn set_uniforms(&mut self, uniforms: &ClipUniforms) {
        (**self).set_uniforms(uniforms)
    }

    fn draw(&mut self, texture: TextureHandle, lut: TextureHandle, quad: &Quad) -> Result<()> {
        (**self).draw(texture, lut, quad)
    }

    fn begin_frame(&mut self, clear: [f32; 4]) -> Result<()> {
        (**self).begin_frame(clear)
    }

    fn flush(&mut self) {
        (**self).flush()
    }

    fn read_target(&mut self) -> Result<FrameBuffer> {
        (**self).read_target()
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        (**self).destroy_texture(texture)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}
