//! Fetching external LUT files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use clipfx_core::{ClipFxError, LutConfig, Result};

/// Source of raw LUT bytes.
#[async_trait]
pub trait LutLoader: Send + Sync {
    /// Fetch the bytes behind a `lutUrl`.
    async fn load(&self, url: &str) -> Result<Vec<u8>>;
}

/// Loads LUTs from the local filesystem.
///
/// Accepts plain paths and `file://` URLs. Relative paths resolve against
/// `root` when one is configured.
#[derive(Debug, Clone, Default)]
pub struct FsLutLoader {
    root: Option<PathBuf>,
}

impl FsLutLoader {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn from_config(config: &LutConfig) -> Self {
        Self::new(config.root_dir.clone())
    }

    /// Map a LUT reference to a filesystem path.
    pub fn resolve(&self, url: &str) -> Result<PathBuf> {
        let path = match url.split_once("://") {
            Some(("file", rest)) => rest,
            Some((scheme, _)) => {
                return Err(ClipFxError::InvalidParameter(format!(
                    "unsupported LUT scheme '{}' in {}",
                    scheme, url
                )))
            }
            None => url,
        };
        let path = Path::new(path);
        Ok(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        })
    }
}

#[async_trait]
impl LutLoader for FsLutLoader {
    async fn load(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.resolve(url)?;
        debug!(path = %path.display(), "Loading LUT");
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ClipFxError::NotFound(path.display().to_string()),
            _ => ClipFxError::Io(e),
        })
    }
}
