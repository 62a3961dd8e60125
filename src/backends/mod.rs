// SPDX-License-Identifier: GPL-3.0-only

//! Frame source abstraction
//!
//! The capture loop and the target finder pull frames through the
//! [`FrameSource`] trait, so a real sensor driver and the file-backed
//! source used on the desktop are interchangeable:
//!
//! ```text
//! ┌──────────────┐   snapshot()   ┌───────────────────┐
//! │ FrameSource  │ ─────────────▶ │ Capture / Finder  │
//! │ (sensor,     │                │                   │
//! │  files, ...) │                │                   │
//! └──────────────┘                └───────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`file_source`]: Frames loaded from image files

pub mod file_source;

pub use file_source::FileFrameSource;

use crate::errors::CaptureError;
use crate::scan::Dimensions;
use image::RgbImage;

/// A single captured frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// Pixel data (RGB8)
    pub image: RgbImage,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }
}

/// Anything that can deliver camera frames on demand
pub trait FrameSource {
    /// Take a snapshot
    fn snapshot(&mut self) -> Result<Frame, CaptureError>;
}
