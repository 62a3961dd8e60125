// SPDX-License-Identifier: GPL-3.0-only

//! Image encoding to disk
//!
//! Writes frames and sub-images in one of the [`OutputFormat`]s. The format
//! follows the configured file suffix rather than being guessed from each
//! path.

use crate::constants::OutputFormat;
use image::{DynamicImage, ImageResult};
use std::path::Path;
use tracing::{debug, trace};

/// Photo encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhotoEncoder {
    format: OutputFormat,
}

impl PhotoEncoder {
    /// Create a new encoder writing `format`
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Create an encoder for a file suffix such as `.bmp`
    ///
    /// Returns `None` when the suffix names no supported format.
    pub fn for_suffix(suffix: &str) -> Option<Self> {
        OutputFormat::from_suffix(suffix).map(Self::new)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Encode `image` and write it to `path`
    ///
    /// JPEG has no alpha channel, so images carrying one are flattened to RGB
    /// first. Other formats keep the source color type.
    pub fn save(&self, image: &DynamicImage, path: &Path) -> ImageResult<()> {
        trace!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            format = ?self.format,
            "Encoding image"
        );

        if self.format == OutputFormat::Jpeg && image.color().has_alpha() {
            let flattened = DynamicImage::ImageRgb8(image.to_rgb8());
            flattened.save_with_format(path, self.format.image_format())?;
        } else {
            image.save_with_format(path, self.format.image_format())?;
        }

        debug!(path = %path.display(), "Image written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{RgbaImage, Rgba};

    #[test]
    fn test_for_suffix() {
        assert_eq!(
            PhotoEncoder::for_suffix(".bmp").map(|e| e.format()),
            Some(OutputFormat::Bmp)
        );
        assert!(PhotoEncoder::for_suffix(".raw").is_none());
    }

    #[test]
    fn test_save_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 3, Rgba([10, 20, 30, 255])));

        for format in OutputFormat::ALL {
            let path = dir.path().join(format!("sample{}", format.suffix()));
            PhotoEncoder::new(format).save(&image, &path).unwrap();

            let reloaded = image::open(&path).unwrap();
            assert_eq!((reloaded.width(), reloaded.height()), (5, 3));
        }
    }
}
