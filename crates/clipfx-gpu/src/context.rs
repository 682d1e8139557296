//! GPU device and queue setup.

use std::sync::Arc;

use clipfx_core::config::PowerPreference;
use clipfx_core::{ClipFxError, Result};
use tracing::info;

/// Adapter, device and queue for one compositor.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

fn wgpu_power_preference(pref: PowerPreference) -> wgpu::PowerPreference {
    match pref {
        PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
        PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
    }
}

impl GpuContext {
    /// Request an adapter and device.
    ///
    /// Fails with [`ClipFxError::Gpu`] when no adapter is available or the
    /// device cannot be created.
    pub async fn new(power_preference: PowerPreference) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu_power_preference(power_preference),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| ClipFxError::Gpu("No suitable GPU adapter found".to_string()))?;

        let adapter_info = adapter.get_info();
        info!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            "Using GPU adapter"
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("ClipFx Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| ClipFxError::Gpu(format!("Failed to create device: {}", e)))?;

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Blocking version of [`GpuContext::new`].
    pub fn new_blocking(power_preference: PowerPreference) -> Result<Self> {
        pollster::block_on(Self::new(power_preference))
    }
}
