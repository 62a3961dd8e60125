// SPDX-License-Identifier: GPL-3.0-only

//! Frames loaded from image files
//!
//! Stands in for a camera sensor: a single image or a directory of images
//! served one per snapshot, cycling back to the first after the last.
//! Frames can be windowed to a fixed, centered size the way the sensor
//! windows its QVGA output.

use super::{Frame, FrameSource};
use crate::constants::file_formats;
use crate::errors::CaptureError;
use crate::scan::{Dimensions, Rectangle};
use image::RgbImage;
use image::imageops;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load an image file as an RGB frame
pub fn load_image_as_frame(path: &Path) -> Result<Frame, CaptureError> {
    debug!(path = %path.display(), "Loading image file");

    let img = image::open(path).map_err(|e| {
        CaptureError::SourceFailed(format!("Failed to load image '{}': {}", path.display(), e))
    })?;

    let frame = Frame::new(img.to_rgb8());
    debug!(
        width = frame.image.width(),
        height = frame.image.height(),
        "Image loaded successfully"
    );
    Ok(frame)
}

/// Rectangle of a centered `target` window inside `dimensions`
///
/// Each axis is clamped to the available extent, so a frame smaller than the
/// target comes back whole on that axis.
pub fn centered_rect(dimensions: Dimensions, target: Dimensions) -> Rectangle {
    let width = target.width.min(dimensions.width);
    let height = target.height.min(dimensions.height);
    Rectangle::new(
        (dimensions.width - width) / 2,
        (dimensions.height - height) / 2,
        width,
        height,
    )
}

/// Crop the centered `target` window out of `image`
pub fn center_window(image: &RgbImage, target: Dimensions) -> RgbImage {
    let rect = centered_rect(Dimensions::new(image.width(), image.height()), target);
    imageops::crop_imm(image, rect.left, rect.top, rect.width, rect.height).to_image()
}

/// Frame source backed by image files
#[derive(Debug, Clone)]
pub struct FileFrameSource {
    paths: Vec<PathBuf>,
    next: usize,
    window: Option<Dimensions>,
}

impl FileFrameSource {
    /// Open a single image file or a directory of images
    ///
    /// Directory entries are served in file name order; files without a
    /// supported image extension are skipped.
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let paths = if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|e| {
                CaptureError::SourceFailed(format!("Cannot list {}: {}", path.display(), e))
            })?;

            let mut paths: Vec<PathBuf> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|p| p.is_file() && is_supported_image(p))
                .collect();
            paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
            paths
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(CaptureError::SourceFailed(format!(
                "No such file or directory: {}",
                path.display()
            )));
        };

        if paths.is_empty() {
            return Err(CaptureError::NoFrameAvailable);
        }

        info!(path = %path.display(), frames = paths.len(), "Opened file frame source");
        Ok(Self {
            paths,
            next: 0,
            window: None,
        })
    }

    /// Window every frame to a centered `target` size
    pub fn with_window(mut self, target: Dimensions) -> Self {
        self.window = Some(target);
        self
    }

    /// Number of distinct frames the source cycles through
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for FileFrameSource {
    fn snapshot(&mut self) -> Result<Frame, CaptureError> {
        let path = self
            .paths
            .get(self.next)
            .ok_or(CaptureError::NoFrameAvailable)?;
        let mut frame = load_image_as_frame(path)?;
        self.next = (self.next + 1) % self.paths.len();

        if let Some(target) = self.window {
            frame.image = center_window(&frame.image, target);
        }
        Ok(frame)
    }
}

/// Check if a path has a supported image extension
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(file_formats::is_image_extension)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_centered_rect_qvga() {
        let rect = centered_rect(Dimensions::new(320, 240), Dimensions::new(240, 240));
        assert_eq!(rect, Rectangle::new(40, 0, 240, 240));
    }

    #[test]
    fn test_centered_rect_clamps() {
        let rect = centered_rect(Dimensions::new(100, 50), Dimensions::new(240, 240));
        assert_eq!(rect, Rectangle::new(0, 0, 100, 50));
    }

    #[test]
    fn test_center_window_pixels() {
        let img = RgbImage::from_fn(8, 4, |x, _| Rgb([x as u8, 0, 0]));
        let windowed = center_window(&img, Dimensions::new(4, 4));
        assert_eq!(windowed.dimensions(), (4, 4));
        assert_eq!(windowed.get_pixel(0, 0)[0], 2);
        assert_eq!(windowed.get_pixel(3, 3)[0], 5);
    }

    #[test]
    fn test_directory_source_cycles() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::new(4, 4).save(dir.path().join("b.png")).unwrap();
        RgbImage::new(6, 2).save(dir.path().join("a.png")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let mut source = FileFrameSource::open(dir.path()).unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.snapshot().unwrap().dimensions(), Dimensions::new(6, 2));
        assert_eq!(source.snapshot().unwrap().dimensions(), Dimensions::new(4, 4));
        assert_eq!(source.snapshot().unwrap().dimensions(), Dimensions::new(6, 2));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileFrameSource::open(dir.path()).unwrap_err();
        assert!(matches!(err, CaptureError::NoFrameAvailable));
    }

    #[test]
    fn test_windowed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        RgbImage::new(320, 240).save(&path).unwrap();

        let mut source = FileFrameSource::open(&path)
            .unwrap()
            .with_window(Dimensions::new(240, 240));
        assert_eq!(source.snapshot().unwrap().dimensions(), Dimensions::new(240, 240));
    }
}
