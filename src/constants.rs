// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application name, used for the config directory
pub const APP_NAME: &str = "tilecam";

/// Image formats the tools can write
///
/// The format is picked from the file suffix so that `.bmp` tiles stay
/// `.bmp` on disk and the classifier sees the same samples it trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Uncompressed bitmap (default, matches the on-device snapshots)
    #[default]
    Bmp,
    /// Lossless PNG
    Png,
    /// Lossy JPEG
    Jpeg,
}

impl OutputFormat {
    /// Get all formats for help output and iteration
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Bmp, OutputFormat::Png, OutputFormat::Jpeg];

    /// Get display name for the format
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputFormat::Bmp => "BMP",
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
        }
    }

    /// Canonical file suffix including the leading dot
    pub fn suffix(&self) -> &'static str {
        match self {
            OutputFormat::Bmp => ".bmp",
            OutputFormat::Png => ".png",
            OutputFormat::Jpeg => ".jpg",
        }
    }

    /// Resolve a format from a suffix such as `.bmp` or `PNG`
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let ext = suffix.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "bmp" => Some(OutputFormat::Bmp),
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }

    /// Resolve a format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_suffix)
    }

    /// Convert to the image crate's ImageFormat
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            OutputFormat::Bmp => image::ImageFormat::Bmp,
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// File format constants
pub mod file_formats {
    /// Supported image file extensions for frame sources
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

    /// Default suffix for dataset tiles and captured photos
    pub const DEFAULT_SUFFIX: &str = ".bmp";

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Photo capture timing and naming
pub mod capture {
    use super::Duration;

    /// Prefix for captured photo files (`IMG0.bmp`, `IMG1.bmp`, ...)
    pub const DEFAULT_PREFIX: &str = "IMG";

    /// Countdown between button release and the shutter firing
    pub const SHUTTER_DELAY: Duration = Duration::from_millis(1000);

    /// Polling interval of the capture loop
    pub const TICK_INTERVAL: Duration = Duration::from_millis(50);
}

/// Target finder defaults, tuned for near-real-time scanning of small frames
pub mod finder {
    use super::Duration;

    /// Window width in pixels
    pub const WINDOW_WIDTH: u32 = 32;

    /// Window height in pixels
    pub const WINDOW_HEIGHT: u32 = 32;

    /// Pixels between the start of neighbouring windows
    pub const HOP: u32 = 10;

    /// Minimum target score for a window to count as a hit
    pub const THRESHOLD: f32 = 0.7;

    /// Label whose score is compared against the threshold
    pub const TARGET_LABEL: &str = "target";

    /// Centered window taken out of each sensor frame before scanning
    pub const FRAME_WIDTH: u32 = 240;
    pub const FRAME_HEIGHT: u32 = 240;

    /// Countdown between button release and the snapshot in live mode
    pub const SHUTTER_DELAY: Duration = Duration::from_millis(800);

    /// Indicator stays dark this long before the snapshot so it does not
    /// light the scene
    pub const LED_OFF_DELAY: Duration = Duration::from_millis(200);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_suffix() {
        assert_eq!(OutputFormat::from_suffix(".bmp"), Some(OutputFormat::Bmp));
        assert_eq!(OutputFormat::from_suffix("PNG"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_suffix(".jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_suffix(".tga"), None);
        assert_eq!(OutputFormat::from_suffix(""), None);
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/background_3.bmp")),
            Some(OutputFormat::Bmp)
        );
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_suffix_round_trip() {
        for format in OutputFormat::ALL {
            assert_eq!(OutputFormat::from_suffix(format.suffix()), Some(format));
        }
    }
}
