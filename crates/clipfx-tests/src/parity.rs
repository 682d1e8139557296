//! CPU export path vs preview compositor.
//!
//! The software backend must match `render_clip_cpu` within one code value on
//! opaque output. Keyed output is compared after blending the CPU result over
//! the transparent clear color, alpha included. The wgpu backend is checked
//! the same way when an adapter exists; without one the test is skipped.

use clipfx_core::config::BackendPreference;
use clipfx_core::{
    ChromaKey, ClipCompositing, ColorCorrectionProps, ColorWheel, CompositorConfig, CurvePoint,
    Curves, FrameBuffer, ImageSource, Levels, WhiteBalance, WipeDirection, WipeRect,
};
use clipfx_effects::render_clip_cpu;
use clipfx_gpu::{create_gpu_compositor, Compositor, RenderBackend, SoftwareBackend};
use proptest::prelude::*;

fn max_diff(a: &FrameBuffer, b: &FrameBuffer) -> u8 {
    assert_eq!((a.width, a.height), (b.width, b.height));
    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

/// What a straight-alpha draw of `frame` over transparent black leaves behind.
fn over_transparent_black(frame: &FrameBuffer) -> FrameBuffer {
    let mut out = frame.clone();
    for px in out.as_bytes_mut().chunks_exact_mut(4) {
        let a = px[3] as f32 / 255.0;
        for c in &mut px[..3] {
            *c = (*c as f32 * a).round() as u8;
        }
    }
    out
}

/// Green ramp running from the key color out to warm tones.
fn green_screen_ramp(width: u32, height: u32) -> FrameBuffer {
    let mut frame = FrameBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 4).min(255) as u8;
            let g = 255u32.saturating_sub(y * 4) as u8;
            let b = (x * 2).min(255) as u8;
            frame.set_pixel(x, y, [r, g, b, 255]);
        }
    }
    frame
}

fn spill_key() -> ColorCorrectionProps {
    ColorCorrectionProps {
        chroma_key: Some(ChromaKey {
            enabled: true,
            color: "#00ff00".into(),
            tolerance: 15.0,
            edge_softness: 20.0,
            spill_suppression: 80.0,
            show_mask: false,
        }),
        ..Default::default()
    }
}

fn render_with<B: RenderBackend>(
    compositor: &mut Compositor<B>,
    frame: &FrameBuffer,
    props: &ColorCorrectionProps,
    compositing: &ClipCompositing,
) -> FrameBuffer {
    compositor.begin_frame([0.0; 4]).unwrap();
    compositor
        .draw_clip("clip", &ImageSource::video_frame(frame), props, compositing)
        .unwrap();
    compositor.flush();
    compositor.read_target().unwrap()
}

fn render_software(
    frame: &FrameBuffer,
    props: &ColorCorrectionProps,
    compositing: &ClipCompositing,
) -> FrameBuffer {
    let mut compositor =
        Compositor::new(SoftwareBackend::new(frame.width, frame.height)).unwrap();
    render_with(&mut compositor, frame, props, compositing)
}

fn s_curve() -> Curves {
    Curves {
        master: vec![
            CurvePoint::new(0.0, 0.0),
            CurvePoint::new(0.25, 0.18),
            CurvePoint::new(0.75, 0.82),
            CurvePoint::new(1.0, 1.0),
        ],
        blue: vec![CurvePoint::new(0.0, 0.1), CurvePoint::new(1.0, 0.9)],
        ..Default::default()
    }
}

fn cases() -> Vec<(&'static str, ColorCorrectionProps, ClipCompositing)> {
    let plain = ClipCompositing::default();
    vec![
        (
            "levels",
            ColorCorrectionProps {
                levels: Some(Levels {
                    input_black: 20.0,
                    input_white: 230.0,
                    output_black: 10.0,
                    output_white: 245.0,
                    gamma: 1.4,
                }),
                ..Default::default()
            },
            plain,
        ),
        (
            "inverted levels",
            ColorCorrectionProps {
                levels: Some(Levels {
                    input_black: 220.0,
                    input_white: 40.0,
                    ..Default::default()
                }),
                ..Default::default()
            },
            plain,
        ),
        (
            "warm white balance",
            ColorCorrectionProps {
                white_balance: Some(WhiteBalance {
                    temperature: 3200.0,
                    tint: 40.0,
                }),
                ..Default::default()
            },
            plain,
        ),
        (
            "cool white balance",
            ColorCorrectionProps {
                white_balance: Some(WhiteBalance {
                    temperature: 7800.0,
                    tint: -60.0,
                }),
                ..Default::default()
            },
            plain,
        ),
        (
            "color wheel",
            ColorCorrectionProps {
                color_wheel: Some(ColorWheel {
                    hue: 120.0,
                    saturation: -20.0,
                    lightness: 10.0,
                }),
                ..Default::default()
            },
            plain,
        ),
        (
            "curves",
            ColorCorrectionProps {
                curves: Some(s_curve()),
                ..Default::default()
            },
            plain,
        ),
        (
            "key mask over full stack",
            ColorCorrectionProps {
                color_wheel: Some(ColorWheel {
                    hue: -30.0,
                    saturation: 10.0,
                    lightness: 0.0,
                }),
                curves: Some(s_curve()),
                levels: Some(Levels {
                    gamma: 0.9,
                    ..Default::default()
                }),
                white_balance: Some(WhiteBalance {
                    temperature: 5600.0,
                    tint: 0.0,
                }),
                lut_url: None,
                chroma_key: Some(ChromaKey {
                    enabled: true,
                    show_mask: true,
                    ..Default::default()
                }),
            },
            plain,
        ),
        (
            "blur",
            ColorCorrectionProps::default(),
            ClipCompositing {
                blur: 2.0,
                ..Default::default()
            },
        ),
        (
            "wipe",
            ColorCorrectionProps {
                levels: Some(Levels {
                    input_black: 30.0,
                    ..Default::default()
                }),
                ..Default::default()
            },
            ClipCompositing {
                wipe: Some(WipeRect::incoming(WipeDirection::Up, 0.6)),
                ..Default::default()
            },
        ),
    ]
}

#[test]
fn software_compositor_matches_cpu_render() {
    let frame = FrameBuffer::gradient(48, 32);
    for (name, props, compositing) in cases() {
        let cpu = render_clip_cpu(&frame, &props, &compositing);
        let preview = render_software(&frame, &props, &compositing);
        assert!(max_diff(&cpu, &preview) <= 1, "{}", name);
    }
}

#[test]
fn software_compositor_matches_cpu_key_with_spill() {
    let frame = green_screen_ramp(48, 32);
    let props = spill_key();
    let compositing = ClipCompositing::default();
    let cpu = render_clip_cpu(&frame, &props, &compositing);

    let alphas: Vec<u8> = cpu.pixels().map(|p| p[3]).collect();
    assert!(alphas.contains(&0));
    assert!(alphas.contains(&255));
    assert!(alphas.iter().any(|a| (1..255).contains(a)));

    let preview = render_software(&frame, &props, &compositing);
    assert!(max_diff(&over_transparent_black(&cpu), &preview) <= 2);
}

#[test]
fn software_compositor_places_clip_in_dest_rect() {
    let frame = FrameBuffer::filled(4, 4, [90, 180, 30, 255]);
    let mut compositor = Compositor::new(SoftwareBackend::new(16, 16)).unwrap();
    let compositing = ClipCompositing {
        dest: Some(clipfx_core::Rect::new(8.0, 8.0, 8.0, 8.0)),
        ..Default::default()
    };
    let out = render_with(&mut compositor, &frame, &ColorCorrectionProps::default(), &compositing);
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(out.pixel(7, 7), [0, 0, 0, 0]);
    assert_eq!(out.pixel(8, 8), [90, 180, 30, 255]);
    assert_eq!(out.pixel(15, 15), [90, 180, 30, 255]);
}

#[test]
fn wgpu_compositor_matches_cpu_render() {
    let frame = FrameBuffer::gradient(64, 32);
    let config = CompositorConfig {
        width: frame.width,
        height: frame.height,
        backend: BackendPreference::Wgpu,
        ..Default::default()
    };
    let Some(mut compositor) = create_gpu_compositor(&config) else {
        eprintln!("skipping wgpu parity: no adapter available");
        return;
    };

    for (name, props, compositing) in cases() {
        let cpu = render_clip_cpu(&frame, &props, &compositing);
        let gpu = render_with(&mut compositor, &frame, &props, &compositing);
        let diff = max_diff(&cpu, &gpu);
        assert!(diff <= 3, "{}: max difference {}", name, diff);
    }

    let keyed_frame = green_screen_ramp(64, 32);
    let props = spill_key();
    let plain = ClipCompositing::default();
    let cpu = over_transparent_black(&render_clip_cpu(&keyed_frame, &props, &plain));
    let gpu = render_with(&mut compositor, &keyed_frame, &props, &plain);
    let diff = max_diff(&cpu, &gpu);
    assert!(diff <= 4, "spill key: max difference {}", diff);
    compositor.dispose();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_grades_match_cpu(
        hue in -180.0f32..=180.0,
        saturation in -100.0f32..=100.0,
        lightness in -100.0f32..=100.0,
        gamma in 0.2f32..3.0,
        temperature in 2000.0f32..=8000.0,
        tint in -150.0f32..=150.0,
    ) {
        let props = ColorCorrectionProps {
            color_wheel: Some(ColorWheel { hue, saturation, lightness }),
            levels: Some(Levels { gamma, ..Default::default() }),
            white_balance: Some(WhiteBalance { temperature, tint }),
            ..Default::default()
        };
        let frame = FrameBuffer::gradient(16, 16);
        let compositing = ClipCompositing::default();
        let cpu = render_clip_cpu(&frame, &props, &compositing);
        let preview = render_software(&frame, &props, &compositing);
        prop_assert!(max_diff(&cpu, &preview) <= 1);
    }
}
