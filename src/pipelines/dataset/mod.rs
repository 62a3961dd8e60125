// SPDX-License-Identifier: GPL-3.0-only

//! Dataset division
//!
//! Breaks every image of an input directory into window-sized sub-images
//! for training:
//!
//! ```text
//! in_dir/a.png ─┐                     ┌─▶ out_dir/{name}_0.bmp
//!               ├─▶ scan ─▶ crop ─────┼─▶ out_dir/{name}_1.bmp
//! in_dir/b.png ─┘                     └─▶ ...
//! ```
//!
//! The counter in the file names runs across the whole directory and is
//! never reset between source images. Sources smaller than the window yield
//! no sub-images and no warning. A failure stops the run; sub-images already
//! written stay on disk.

use crate::errors::DatasetError;
use crate::pipelines::photo::PhotoEncoder;
use crate::scan::{Dimensions, WindowScanner, WindowSpec};
use crate::storage;
use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Totals of one division run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DivideSummary {
    /// Source images processed
    pub sources: usize,
    /// Sub-images written
    pub tiles: u64,
    /// Sources too small for a single window
    pub skipped: usize,
}

/// Splits source images into numbered sub-images
#[derive(Debug, Clone)]
pub struct DatasetDivider {
    scanner: WindowScanner,
    encoder: PhotoEncoder,
    prefix: String,
    suffix: String,
}

impl DatasetDivider {
    /// Create a divider writing `{prefix}_{n}{suffix}` files
    pub fn new(spec: WindowSpec, prefix: &str, suffix: &str) -> Result<Self, DatasetError> {
        let encoder = PhotoEncoder::for_suffix(suffix)
            .ok_or_else(|| DatasetError::UnsupportedSuffix(suffix.to_string()))?;

        Ok(Self {
            scanner: WindowScanner::new(spec),
            encoder,
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Regular files of `in_dir`, in file name order
    pub fn source_files(in_dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
        let read_dir_error = |e: std::io::Error| DatasetError::ReadDir {
            path: in_dir.to_path_buf(),
            reason: e.to_string(),
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(in_dir).map_err(read_dir_error)? {
            let path = entry.map_err(read_dir_error)?.path();
            if path.is_file() {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Divide every image of `in_dir` into `out_dir`
    ///
    /// `out_dir` must already exist. Numbering starts at zero.
    pub fn divide(&self, in_dir: &Path, out_dir: &Path) -> Result<DivideSummary, DatasetError> {
        let files = Self::source_files(in_dir)?;
        info!(
            in_dir = %in_dir.display(),
            out_dir = %out_dir.display(),
            files = files.len(),
            "Dividing images"
        );

        let mut summary = DivideSummary::default();
        let mut counter = 0u64;

        for path in &files {
            let image = image::open(path).map_err(|e| DatasetError::Decode {
                path: path.clone(),
                reason: e.to_string(),
            })?;

            let written = self.divide_image(&image, out_dir, &mut counter)?;
            summary.sources += 1;
            summary.tiles += written;
            if written == 0 {
                summary.skipped += 1;
                debug!(path = %path.display(), "Image smaller than window, no sub-images");
            } else {
                debug!(path = %path.display(), written, "Divided image");
            }
        }

        info!(
            sources = summary.sources,
            tiles = summary.tiles,
            skipped = summary.skipped,
            "Division complete"
        );
        Ok(summary)
    }

    /// Write the sub-images of one image, numbering from `counter`
    ///
    /// `counter` is advanced once per sub-image written. Returns how many
    /// were written.
    pub fn divide_image(
        &self,
        image: &DynamicImage,
        out_dir: &Path,
        counter: &mut u64,
    ) -> Result<u64, DatasetError> {
        let (width, height) = image.dimensions();
        let mut written = 0;

        for rect in self.scanner.scan(Dimensions::new(width, height)) {
            let tile = image.crop_imm(rect.left, rect.top, rect.width, rect.height);
            let path = out_dir.join(storage::tile_file_name(&self.prefix, *counter, &self.suffix));

            self.encoder
                .save(&tile, &path)
                .map_err(|e| DatasetError::Write {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

            *counter += 1;
            written += 1;
        }

        Ok(written)
    }
}
