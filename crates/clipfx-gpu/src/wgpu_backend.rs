//! wgpu implementation of [`RenderBackend`].

use std::collections::HashMap;
use std::sync::mpsc;

use clipfx_core::{ClipFxError, CompositorConfig, FrameBuffer, Result, BYTES_PER_PIXEL};
use tracing::{debug, info};

use crate::backend::{Quad, RenderBackend, TextureHandle, Vertex};
use crate::context::GpuContext;
use crate::shader::{clip_shader_source, FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::texture::{padded_bytes_per_row, GpuTexture, TEXTURE_FORMAT};
use crate::uniforms::ClipUniforms;

/// Renders clips with the WGSL clip shader into an offscreen target.
pub struct WgpuBackend {
    context: GpuContext,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    target: Option<GpuTexture>,
    target_size: (u32, u32),
    textures: HashMap<TextureHandle, GpuTexture>,
    next_id: u64,
    uniforms: ClipUniforms,
    disposed: bool,
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Run `f` inside a validation error scope and turn a captured error into
/// `on_error(message)`.
fn validated<T>(
    device: &wgpu::Device,
    on_error: impl FnOnce(String) -> ClipFxError,
    f: impl FnOnce() -> T,
) -> Result<T> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(on_error(err.to_string())),
        None => Ok(value),
    }
}

impl WgpuBackend {
    /// Create a device, compile the clip pipeline and allocate the target.
    pub fn new(config: &CompositorConfig) -> Result<Self> {
        let context = GpuContext::new_blocking(config.power_preference)?;
        Self::with_context(context, config.width, config.height)
    }

    pub fn with_context(context: GpuContext, width: u32, height: u32) -> Result<Self> {
        let device = context.device.clone();

        let source = clip_shader_source();
        let module = validated(&device, ClipFxError::Shader, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Clip Shader"),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        })?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Clip Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                texture_entry(3),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Clip Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = validated(&device, ClipFxError::Gpu, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Clip Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(VERTEX_ENTRY),
                    buffers: &[Vertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: TEXTURE_FORMAT,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview: None,
                cache: None,
            })
        })?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Clip Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Clip Uniforms"),
            size: std::mem::size_of::<ClipUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Clip Quad"),
            size: (std::mem::size_of::<Vertex>() * 6) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let target = GpuTexture::render_target(&device, width, height);
        info!(width, height, "wgpu compositor backend ready");

        Ok(Self {
            context,
            pipeline,
            bind_group_layout,
            sampler,
            uniform_buffer,
            vertex_buffer,
            target: Some(target),
            target_size: (width, height),
            textures: HashMap::new(),
            next_id: 1,
            uniforms: ClipUniforms::default(),
            disposed: false,
        })
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    fn target(&self) -> Result<&GpuTexture> {
        self.target
            .as_ref()
            .ok_or_else(|| ClipFxError::Gpu("Backend has been disposed".to_string()))
    }

    fn texture(&self, handle: TextureHandle) -> Result<&GpuTexture> {
        self.textures
            .get(&handle)
            .ok_or_else(|| ClipFxError::NotFound(format!("texture {}", handle.0)))
    }
}

impl RenderBackend for WgpuBackend {
    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    fn create_texture(&mut self, width: u32, height: u32, label: &str) -> Result<TextureHandle> {
        if self.disposed {
            return Err(ClipFxError::Gpu("Backend has been disposed".to_string()));
        }
        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        let texture = GpuTexture::sampled(&self.context.device, width, height, label);
        self.textures.insert(handle, texture);
        Ok(handle)
    }

    fn upload(&mut self, texture: TextureHandle, pixels: &[u8]) -> Result<()> {
        self.texture(texture)?
            .upload_rgba(&self.context.queue, pixels)
    }

    fn set_uniforms(&mut self, uniforms: &ClipUniforms) {
        self.uniforms = *uniforms;
    }

    fn draw(&mut self, texture: TextureHandle, lut: TextureHandle, quad: &Quad) -> Result<()> {
        let source = self.texture(texture)?;
        let lut = self.texture(lut)?;
        let target = self.target()?;
        let device = &self.context.device;
        let queue = &self.context.queue;

        let (tw, th) = self.target_size;
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));
        queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(&quad.vertices(tw, th)),
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Clip Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&source.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&lut.view),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Clip Draw"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clip Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.draw(0..6, 0..1);
        }
        // One submission per draw keeps the buffer writes above in order.
        queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn begin_frame(&mut self, clear: [f32; 4]) -> Result<()> {
        let target = self.target()?;
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Clear Target"),
                });
        {
            let [r, g, b, a] = clear.map(|c| c as f64);
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.context.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn flush(&mut self) {
        let _ = self.context.device.poll(wgpu::Maintain::Poll);
    }

    fn read_target(&mut self) -> Result<FrameBuffer> {
        let target = self.target()?;
        let (width, height) = self.target_size;
        let padded = padded_bytes_per_row(width);
        let device = &self.context.device;

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Target Readback"),
            size: padded as u64 * height.max(1) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Target Readback"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(height.max(1)),
                },
            },
            wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
        );
        self.context.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|e| ClipFxError::Gpu(format!("Readback channel closed: {}", e)))?
            .map_err(|e| ClipFxError::Gpu(format!("Failed to map readback buffer: {}", e)))?;

        let row_bytes = width as usize * BYTES_PER_PIXEL;
        let mut pixels = Vec::with_capacity(row_bytes * height as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks(padded as usize).take(height as usize) {
                pixels.extend_from_slice(&row[..row_bytes]);
            }
        }
        staging.unmap();

        FrameBuffer::from_raw(width, height, pixels)
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if let Some(tex) = self.textures.remove(&texture) {
            tex.texture.destroy();
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for (_, tex) in self.textures.drain() {
            tex.texture.destroy();
        }
        if let Some(target) = self.target.take() {
            target.texture.destroy();
        }
        self.disposed = true;
        debug!("wgpu backend disposed");
    }
}
