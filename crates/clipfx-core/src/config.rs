//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClipFxError, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Preview compositor settings.
    pub compositor: CompositorConfig,

    /// External LUT lookup.
    pub lut: LutConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "clipfx_gpu=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Which renderer backs the preview compositor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// wgpu when an adapter is available, otherwise CPU rendering.
    #[default]
    Auto,
    Wgpu,
    Software,
}

/// GPU adapter power preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    LowPower,
    #[default]
    HighPerformance,
}

/// Preview compositor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Render target width in pixels.
    pub width: u32,

    /// Render target height in pixels.
    pub height: u32,

    /// RGBA clear color, `0..1`.
    pub clear_color: [f32; 4],

    pub backend: BackendPreference,

    pub power_preference: PowerPreference,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            backend: BackendPreference::Auto,
            power_preference: PowerPreference::HighPerformance,
        }
    }
}

/// Where relative LUT references resolve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LutConfig {
    /// Base directory for relative `lutUrl` values.
    pub root_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| ClipFxError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    /// or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Using default engine config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.compositor.width == 0 || self.compositor.height == 0 {
            return Err(ClipFxError::Config(format!(
                "compositor size must be non-zero, got {}x{}",
                self.compositor.width, self.compositor.height
            )));
        }
        Ok(())
    }
}
