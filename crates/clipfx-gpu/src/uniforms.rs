//! Per-draw parameter block shared by the shader and the software backend.

use bytemuck::{Pod, Zeroable};
use clipfx_color::CurveLuts;
use clipfx_core::{ClipCompositing, ColorWheel, Levels, WipeRect};
use clipfx_effects::{ChromaKeyParams, CorrectionPlan};

/// Uniform block layout of `shaders/clip.wgsl`. Every field is a `vec4<f32>`
/// so the struct has no padding; a trailing `w` of 1 enables a stage.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ClipUniforms {
    /// input black, input white, gamma, enabled
    pub levels_in: [f32; 4],
    /// output black, output white, -, -
    pub levels_out: [f32; 4],
    /// r, g, b multipliers, enabled
    pub white_balance: [f32; 4],
    /// hue (degrees), saturation (%), lightness (%), enabled
    pub color_wheel: [f32; 4],
    /// key r, g, b (0..255), enabled
    pub key_color: [f32; 4],
    /// tolerance, edge softness, spill suppression (0..1), show mask
    pub key_params: [f32; 4],
    /// x0, y0, x1, y1 in normalized target coordinates
    pub wipe: [f32; 4],
    /// opacity, blur (texels), curves enabled, wipe enabled
    pub misc: [f32; 4],
    /// target width, target height, 1 / source width, 1 / source height
    pub sizes: [f32; 4],
}

#[inline]
fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

#[inline]
fn is_set(v: f32) -> bool {
    v > 0.5
}

impl Default for ClipUniforms {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl ClipUniforms {
    pub fn new(
        plan: &CorrectionPlan,
        compositing: &ClipCompositing,
        target_size: (u32, u32),
        source_size: (u32, u32),
    ) -> Self {
        let mut u = Self::zeroed();

        if let Some(l) = &plan.levels {
            u.levels_in = [l.input_black, l.input_white, l.gamma, 1.0];
            u.levels_out = [l.output_black, l.output_white, 0.0, 0.0];
        }
        if let Some([r, g, b]) = plan.white_balance {
            u.white_balance = [r, g, b, 1.0];
        }
        if let Some(w) = &plan.color_wheel {
            u.color_wheel = [w.hue, w.saturation, w.lightness, 1.0];
        }
        if let Some(k) = &plan.chroma_key {
            u.key_color = [k.key_rgb[0], k.key_rgb[1], k.key_rgb[2], 1.0];
            u.key_params = [
                k.tolerance,
                k.edge_softness,
                k.spill_suppression,
                flag(k.show_mask),
            ];
        }

        let wipe = compositing.wipe.unwrap_or(WipeRect::FULL);
        u.wipe = wipe.as_array();
        u.misc = [
            compositing.opacity.clamp(0.0, 1.0),
            compositing.blur.max(0.0),
            flag(plan.curves.is_some()),
            flag(compositing.wipe.is_some()),
        ];
        u.sizes = [
            target_size.0 as f32,
            target_size.1 as f32,
            1.0 / source_size.0.max(1) as f32,
            1.0 / source_size.1.max(1) as f32,
        ];
        u
    }

    pub fn curves_enabled(&self) -> bool {
        is_set(self.misc[2])
    }

    pub fn opacity(&self) -> f32 {
        self.misc[0]
    }

    pub fn blur(&self) -> f32 {
        self.misc[1]
    }

    pub fn wipe_rect(&self) -> Option<WipeRect> {
        is_set(self.misc[3]).then(|| {
            let [x0, y0, x1, y1] = self.wipe;
            WipeRect::new(x0, y0, x1, y1)
        })
    }

    /// Rebuild the color plan the block encodes. Curves live in a texture,
    /// so the caller passes them in.
    pub fn to_plan(&self, curves: Option<CurveLuts>) -> CorrectionPlan {
        let levels = is_set(self.levels_in[3]).then(|| Levels {
            input_black: self.levels_in[0],
            input_white: self.levels_in[1],
            gamma: self.levels_in[2],
            output_black: self.levels_out[0],
            output_white: self.levels_out[1],
        });
        let white_balance = is_set(self.white_balance[3]).then(|| {
            let [r, g, b, _] = self.white_balance;
            [r, g, b]
        });
        let color_wheel = is_set(self.color_wheel[3]).then(|| ColorWheel {
            hue: self.color_wheel[0],
            saturation: self.color_wheel[1],
            lightness: self.color_wheel[2],
        });
        let chroma_key = is_set(self.key_color[3]).then(|| ChromaKeyParams {
            key_rgb: [self.key_color[0], self.key_color[1], self.key_color[2]],
            tolerance: self.key_params[0],
            edge_softness: self.key_params[1],
            spill_suppression: self.key_params[2],
            show_mask: is_set(self.key_params[3]),
        });

        CorrectionPlan {
            levels,
            white_balance,
            color_wheel,
            curves: curves.filter(|_| self.curves_enabled()),
            chroma_key,
        }
    }
}
