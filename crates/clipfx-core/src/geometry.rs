//! Geometric primitives for placing clips and masking transitions.

use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector.
pub type Vec2 = GlamVec2;

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width` x `height` surface.
    #[inline]
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Minimum corner (top-left).
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maximum corner (bottom-right).
    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Map a pixel-space point to normalized device coordinates of a
    /// `target` sized surface (y up).
    #[inline]
    pub fn to_ndc(point: Vec2, target: Vec2) -> Vec2 {
        Vec2::new(
            point.x / target.x * 2.0 - 1.0,
            1.0 - point.y / target.y * 2.0,
        )
    }
}

/// Edge a wipe travels from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WipeDirection {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

/// Rectangular mask in normalized screen space (`0..1` on both axes, y down).
///
/// Fragments whose normalized position falls outside `[x0, x1) x [y0, y1)`
/// are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WipeRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Default for WipeRect {
    fn default() -> Self {
        Self::FULL
    }
}

impl WipeRect {
    /// Mask that keeps everything.
    pub const FULL: Self = Self {
        x0: 0.0,
        y0: 0.0,
        x1: 1.0,
        y1: 1.0,
    };

    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Region revealed for the incoming clip at `progress`.
    pub fn incoming(direction: WipeDirection, progress: f32) -> Self {
        let p = progress.clamp(0.0, 1.0);
        match direction {
            WipeDirection::Left => Self::new(0.0, 0.0, p, 1.0),
            WipeDirection::Right => Self::new(1.0 - p, 0.0, 1.0, 1.0),
            WipeDirection::Up => Self::new(0.0, 0.0, 1.0, p),
            WipeDirection::Down => Self::new(0.0, 1.0 - p, 1.0, 1.0),
        }
    }

    /// Region still showing the outgoing clip at `progress`.
    pub fn outgoing(direction: WipeDirection, progress: f32) -> Self {
        let p = progress.clamp(0.0, 1.0);
        match direction {
            WipeDirection::Left => Self::new(p, 0.0, 1.0, 1.0),
            WipeDirection::Right => Self::new(0.0, 0.0, 1.0 - p, 1.0),
            WipeDirection::Up => Self::new(0.0, p, 1.0, 1.0),
            WipeDirection::Down => Self::new(0.0, 0.0, 1.0, 1.0 - p),
        }
    }

    /// Whether a normalized point survives the mask.
    #[inline]
    pub fn contains(&self, u: f32, v: f32) -> bool {
        u >= self.x0 && u < self.x1 && v >= self.y0 && v < self.y1
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(r.contains(Vec2::new(50.0, 50.0)));
        assert!(!r.contains(Vec2::new(150.0, 50.0)));
        assert!(!r.contains(Vec2::new(100.0, 50.0)));
    }

    #[test]
    fn test_to_ndc_corners() {
        let target = Vec2::new(200.0, 100.0);
        assert_eq!(Rect::to_ndc(Vec2::ZERO, target), Vec2::new(-1.0, 1.0));
        assert_eq!(Rect::to_ndc(target, target), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_wipe_incoming_and_outgoing_partition() {
        for dir in [
            WipeDirection::Left,
            WipeDirection::Right,
            WipeDirection::Up,
            WipeDirection::Down,
        ] {
            let a = WipeRect::incoming(dir, 0.3);
            let b = WipeRect::outgoing(dir, 0.3);
            for &(u, v) in &[(0.05, 0.05), (0.5, 0.5), (0.95, 0.95), (0.2, 0.8)] {
                assert_ne!(a.contains(u, v), b.contains(u, v), "{dir:?} at ({u}, {v})");
            }
        }
    }

    #[test]
    fn test_wipe_progress_extremes() {
        let none = WipeRect::incoming(WipeDirection::Left, 0.0);
        assert!(!none.contains(0.0, 0.5));
        let all = WipeRect::incoming(WipeDirection::Left, 1.0);
        assert!(all.contains(0.999, 0.5));
    }

    proptest! {
        #[test]
        fn prop_wipe_halves_never_overlap(
            dir in prop_oneof![
                Just(WipeDirection::Left),
                Just(WipeDirection::Right),
                Just(WipeDirection::Up),
                Just(WipeDirection::Down),
            ],
            progress in 0.0f32..=1.0,
            u in 0.0f32..1.0,
            v in 0.0f32..1.0,
        ) {
            let a = WipeRect::incoming(dir, progress);
            let b = WipeRect::outgoing(dir, progress);
            prop_assert_ne!(a.contains(u, v), b.contains(u, v));
        }
    }
}
