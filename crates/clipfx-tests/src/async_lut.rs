//! Async correction against LUT files on disk.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use clipfx_core::{ChromaKey, ClipFxError, ColorCorrectionProps, FrameBuffer, Result};
use clipfx_effects::{apply_color_correction_async, AsyncCorrector, FsLutLoader, LutLoader};

const INVERT_CUBE: &str = "\
TITLE \"invert\"
LUT_3D_SIZE 2
1 1 1
0 1 1
1 0 1
0 0 1
1 1 0
0 1 0
1 0 0
0 0 0
";

struct LutDir(PathBuf);

impl LutDir {
    async fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("clipfx-luts-{}-{}", name, std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("invert.cube"), INVERT_CUBE).await.unwrap();
        tokio::fs::write(dir.join("broken.cube"), "LUT_3D_SIZE 2\n0 0 0\n").await.unwrap();
        Self(dir)
    }

    fn loader(&self) -> FsLutLoader {
        FsLutLoader::new(Some(self.0.clone()))
    }
}

impl Drop for LutDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

fn with_lut(url: &str) -> ColorCorrectionProps {
    ColorCorrectionProps {
        lut_url: Some(url.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn cube_lut_from_disk_is_applied() {
    let dir = LutDir::new("apply").await;
    let frame = FrameBuffer::filled(3, 2, [255, 0, 0, 200]);
    let out = apply_color_correction_async(&frame, &with_lut("invert.cube"), &dir.loader()).await;
    assert!(out.pixels().all(|p| p == [0, 255, 255, 200]));
}

#[tokio::test]
async fn file_url_resolves_absolute_path() {
    let dir = LutDir::new("url").await;
    let url = format!("file://{}", dir.0.join("invert.cube").display());
    let frame = FrameBuffer::filled(1, 1, [0, 0, 0, 255]);
    let out = apply_color_correction_async(&frame, &with_lut(&url), &FsLutLoader::default()).await;
    assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
}

#[tokio::test]
async fn missing_and_broken_luts_fail_open() {
    let dir = LutDir::new("fail").await;
    let frame = FrameBuffer::gradient(8, 8);
    for url in ["nope.cube", "broken.cube", "https://example.com/lut.png"] {
        let out = apply_color_correction_async(&frame, &with_lut(url), &dir.loader()).await;
        assert_eq!(out, frame, "{}", url);
    }
}

#[tokio::test]
async fn lut_runs_after_chroma_key() {
    let dir = LutDir::new("order").await;
    let props = ColorCorrectionProps {
        chroma_key: Some(ChromaKey {
            enabled: true,
            color: "#00ff00".into(),
            tolerance: 10.0,
            edge_softness: 5.0,
            spill_suppression: 0.0,
            show_mask: false,
        }),
        ..with_lut("invert.cube")
    };
    // keyed on the original green, then inverted to magenta
    let frame = FrameBuffer::filled(2, 2, [0, 255, 0, 255]);
    let out = apply_color_correction_async(&frame, &props, &dir.loader()).await;
    assert!(out.pixels().all(|p| p == [255, 0, 255, 0]));
}

#[tokio::test]
async fn corrector_caches_decoded_luts() {
    let dir = LutDir::new("cache").await;
    let corrector = AsyncCorrector::new(dir.loader());
    let frame = FrameBuffer::filled(2, 2, [0, 0, 0, 255]);
    let props = with_lut("invert.cube");

    let first = corrector.correct("clip", &frame, &props).await.unwrap();
    // the file is gone, the cached LUT still applies
    tokio::fs::remove_file(dir.0.join("invert.cube")).await.unwrap();
    let second = corrector.correct("clip", &frame, &props).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(corrector.cached_luts(), 1);

    corrector.invalidate_lut("invert.cube");
    let third = corrector.correct("clip", &frame, &props).await.unwrap();
    assert_eq!(third, frame);
}

/// Serves LUTs from memory, the way a host with its own asset store would.
struct MemoryLoader(HashMap<String, Vec<u8>>);

#[async_trait]
impl LutLoader for MemoryLoader {
    async fn load(&self, url: &str) -> Result<Vec<u8>> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| ClipFxError::NotFound(url.to_string()))
    }
}

#[tokio::test]
async fn host_loader_supplies_cube_bytes() {
    let loader = MemoryLoader(HashMap::from([(
        "asset://invert.cube".to_string(),
        INVERT_CUBE.as_bytes().to_vec(),
    )]));
    let frame = FrameBuffer::filled(2, 1, [10, 20, 30, 255]);

    let out = apply_color_correction_async(&frame, &with_lut("asset://invert.cube"), &loader).await;
    assert!(out.pixels().all(|p| p == [245, 235, 225, 255]));

    let missing = apply_color_correction_async(&frame, &with_lut("asset://other.cube"), &loader).await;
    assert_eq!(missing, frame);
}
