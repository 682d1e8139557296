//! Decoded image sources handed to the GPU compositor.

use crate::frame::{FrameBuffer, BYTES_PER_PIXEL};

/// What produced a source's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Decoded still image.
    Still,
    /// Bitmap drawn by the host (titles, generated content).
    Bitmap,
    /// Decoded video frame. Content changes every frame.
    VideoFrame,
}

impl SourceKind {
    /// Still images and bitmaps can keep their uploaded texture across frames.
    #[inline]
    pub fn is_static(self) -> bool {
        matches!(self, Self::Still | Self::Bitmap)
    }
}

/// RGBA8 pixels plus the metadata the compositor needs to decide on uploads.
#[derive(Debug, Clone, Copy)]
pub struct ImageSource<'a> {
    pub kind: SourceKind,
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [u8],
    /// Caller-maintained content version. `None` means the content may have
    /// changed since the last call.
    pub version: Option<u64>,
}

impl<'a> ImageSource<'a> {
    pub fn new(kind: SourceKind, width: u32, height: u32, pixels: &'a [u8]) -> Self {
        Self {
            kind,
            width,
            height,
            pixels,
            version: None,
        }
    }

    /// Video frame view over a CPU frame buffer.
    pub fn video_frame(frame: &'a FrameBuffer) -> Self {
        Self::new(SourceKind::VideoFrame, frame.width, frame.height, frame.as_bytes())
    }

    /// Still image view over a CPU frame buffer, marked immutable at `version`.
    pub fn still(frame: &'a FrameBuffer, version: u64) -> Self {
        Self::new(SourceKind::Still, frame.width, frame.height, frame.as_bytes())
            .with_version(version)
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Immutable sources may skip re-upload when their version is unchanged.
    #[inline]
    pub fn is_immutable(&self) -> bool {
        self.kind.is_static() && self.version.is_some()
    }

    /// Whether the pixel slice matches the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}
