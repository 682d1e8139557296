//! Clip shader source assembly.

use clipfx_color::wgsl_prelude;

const CLIP_SHADER_BODY: &str = include_str!("../shaders/clip.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Full WGSL source: generated constants followed by the clip shader.
pub fn clip_shader_source() -> String {
    let mut source = wgsl_prelude();
    source.push('\n');
    source.push_str(CLIP_SHADER_BODY);
    source
}
