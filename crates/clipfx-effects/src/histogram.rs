//! Per-channel and luminance histograms for scopes.

use rayon::prelude::*;

use clipfx_color::luma;
use clipfx_core::FrameBuffer;

/// Pixels per rayon work item.
const CHUNK_PIXELS: usize = 16 * 1024;

/// Four 256-bucket histograms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub red: [u32; 256],
    pub green: [u32; 256],
    pub blue: [u32; 256],
    pub luminance: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            luminance: [0; 256],
        }
    }
}

impl Histogram {
    #[inline]
    fn add(&mut self, px: &[u8]) {
        self.red[px[0] as usize] += 1;
        self.green[px[1] as usize] += 1;
        self.blue[px[2] as usize] += 1;
        let y = luma([px[0] as f32, px[1] as f32, px[2] as f32]);
        self.luminance[(y.round() as usize).min(255)] += 1;
    }

    fn merge(mut self, other: Self) -> Self {
        for i in 0..256 {
            self.red[i] += other.red[i];
            self.green[i] += other.green[i];
            self.blue[i] += other.blue[i];
            self.luminance[i] += other.luminance[i];
        }
        self
    }

    /// Largest bucket across all four channels, for scaling a scope display.
    pub fn peak(&self) -> u32 {
        [&self.red, &self.green, &self.blue, &self.luminance]
            .iter()
            .flat_map(|h| h.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Number of pixels counted.
    pub fn total(&self) -> u64 {
        self.luminance.iter().map(|&c| c as u64).sum()
    }
}

/// Count every pixel of `frame` once.
pub fn compute_histogram(frame: &FrameBuffer) -> Histogram {
    frame
        .as_bytes()
        .par_chunks(CHUNK_PIXELS * 4)
        .fold(Histogram::default, |mut hist, chunk| {
            for px in chunk.chunks_exact(4) {
                hist.add(px);
            }
            hist
        })
        .reduce(Histogram::default, Histogram::merge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_frame() {
        let frame = FrameBuffer::filled(10, 10, [255, 0, 0, 255]);
        let hist = compute_histogram(&frame);
        assert_eq!(hist.red[255], 100);
        assert_eq!(hist.green[0], 100);
        assert_eq!(hist.blue[0], 100);
        // 0.299 * 255 = 76.2
        assert_eq!(hist.luminance[76], 100);
        assert_eq!(hist.total(), 100);
        assert_eq!(hist.peak(), 100);
    }

    #[test]
    fn test_counts_cover_every_pixel() {
        let frame = FrameBuffer::gradient(300, 200);
        let hist = compute_histogram(&frame);
        let count = |h: &[u32; 256]| h.iter().map(|&c| c as u64).sum::<u64>();
        assert_eq!(count(&hist.red), 60_000);
        assert_eq!(count(&hist.green), 60_000);
        assert_eq!(count(&hist.blue), 60_000);
        assert_eq!(hist.total(), 60_000);
    }

    #[test]
    fn test_white_luma_is_top_bucket() {
        let frame = FrameBuffer::filled(2, 2, [255, 255, 255, 0]);
        assert_eq!(compute_histogram(&frame).luminance[255], 4);
    }

    #[test]
    fn test_empty_frame() {
        let hist = compute_histogram(&FrameBuffer::new(0, 0));
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.peak(), 0);
    }
}
