//! Engine configuration driving compositor construction.

use std::path::PathBuf;

use clipfx_core::{
    ClipCompositing, ColorCorrectionProps, EngineConfig, FrameBuffer, ImageSource,
};
use clipfx_effects::FsLutLoader;
use clipfx_gpu::{create_compositor, RenderBackend};

fn write_config(name: &str, json: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("clipfx-it-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("engine.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn software_config_renders_frames() {
    let path = write_config(
        "software",
        r#"{"logging": {"level": "clipfx_gpu=debug,warn", "json": true},
            "compositor": {"width": 8, "height": 4, "backend": "software",
            "clear_color": [1.0, 0.0, 0.0, 1.0]}}"#,
    );
    let config = EngineConfig::load(&path).unwrap();
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
    assert!(config.logging.json);
    clipfx_core::logging::init_logging(&config.logging);

    let mut compositor = create_compositor(&config.compositor).unwrap();
    assert_eq!(compositor.backend().name(), "software");

    compositor.begin_frame(config.compositor.clear_color).unwrap();
    let out = compositor.read_target().unwrap();
    assert!(out.pixels().all(|p| p == [255, 0, 0, 255]));

    let frame = FrameBuffer::filled(8, 4, [0, 0, 255, 255]);
    compositor
        .draw_clip(
            "clip",
            &ImageSource::video_frame(&frame),
            &ColorCorrectionProps::default(),
            &ClipCompositing::default(),
        )
        .unwrap();
    compositor.flush();
    assert_eq!(compositor.read_target().unwrap(), frame);
    compositor.dispose();
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let path = write_config("invalid", r#"{"compositor": {"width": 0}}"#);
    let config = EngineConfig::load_or_default(&path);
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
    assert_eq!(config.compositor.width, 1920);
}

#[test]
fn lut_root_resolves_relative_urls() {
    let config: EngineConfig =
        serde_json::from_str(r#"{"lut": {"root_dir": "/srv/luts"}}"#).unwrap();
    let loader = FsLutLoader::from_config(&config.lut);
    assert_eq!(
        loader.resolve("film/warm.cube").unwrap(),
        PathBuf::from("/srv/luts/film/warm.cube")
    );
}
