// SPDX-License-Identifier: GPL-3.0-only

//! Geometry types shared by every sliding-window scan
//!
//! All values are whole pixels. A scan never reads pixel data; it only
//! needs the extent of the image and the shape of the window.

use crate::errors::ScanError;
use serde::{Deserialize, Serialize};

/// Pixel extent of an image or camera frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Window size and hop distance for a scan
///
/// Construction validates that every field is positive, so a `WindowSpec`
/// in hand is always scannable. Deserialized specs go through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindowSpec")]
pub struct WindowSpec {
    window_width: u32,
    window_height: u32,
    hop: u32,
}

#[derive(Deserialize)]
struct RawWindowSpec {
    window_width: u32,
    window_height: u32,
    hop: u32,
}

impl TryFrom<RawWindowSpec> for WindowSpec {
    type Error = ScanError;

    fn try_from(raw: RawWindowSpec) -> Result<Self, Self::Error> {
        WindowSpec::new(raw.window_width, raw.window_height, raw.hop)
    }
}

impl WindowSpec {
    /// Create a window spec, rejecting zero-sized windows and a zero hop
    pub fn new(window_width: u32, window_height: u32, hop: u32) -> Result<Self, ScanError> {
        if window_width == 0 {
            return Err(ScanError::InvalidConfiguration(
                "window width must be greater than zero".to_string(),
            ));
        }
        if window_height == 0 {
            return Err(ScanError::InvalidConfiguration(
                "window height must be greater than zero".to_string(),
            ));
        }
        if hop == 0 {
            return Err(ScanError::InvalidConfiguration(
                "hop distance must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            window_width,
            window_height,
            hop,
        })
    }

    /// Square window of `size` pixels
    pub fn square(size: u32, hop: u32) -> Result<Self, ScanError> {
        Self::new(size, size, hop)
    }

    pub fn window_width(&self) -> u32 {
        self.window_width
    }

    pub fn window_height(&self) -> u32 {
        self.window_height
    }

    pub fn hop(&self) -> u32 {
        self.hop
    }

    /// Number of window positions along one axis of length `extent`
    fn positions(extent: u32, window: u32, hop: u32) -> u32 {
        if window > extent {
            0
        } else {
            (extent - window) / hop + 1
        }
    }

    /// Grid of window positions over `dimensions` as (columns, rows)
    ///
    /// Either value is zero when the window does not fit on that axis.
    pub fn grid(&self, dimensions: Dimensions) -> (u32, u32) {
        let columns = Self::positions(dimensions.width, self.window_width, self.hop);
        let rows = Self::positions(dimensions.height, self.window_height, self.hop);
        if columns == 0 || rows == 0 {
            (0, 0)
        } else {
            (columns, rows)
        }
    }
}

/// A crop rectangle in pixel coordinates
///
/// `left`/`top` is the inclusive top-left corner; the rectangle covers
/// `left..left + width` horizontally and `top..top + height` vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// True when the rectangle lies entirely inside `dimensions`
    pub fn within(&self, dimensions: Dimensions) -> bool {
        self.right() <= dimensions.width && self.bottom() <= dimensions.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_spec_rejects_zero_fields() {
        assert!(WindowSpec::new(0, 32, 10).is_err());
        assert!(WindowSpec::new(32, 0, 10).is_err());
        assert!(WindowSpec::new(32, 32, 0).is_err());
        assert!(WindowSpec::new(1, 1, 1).is_ok());
    }

    #[test]
    fn test_window_spec_deserialize_validates() {
        let ok: WindowSpec =
            serde_json::from_str(r#"{"window_width":28,"window_height":28,"hop":14}"#).unwrap();
        assert_eq!(ok.window_width(), 28);
        assert_eq!(ok.hop(), 14);

        let bad = serde_json::from_str::<WindowSpec>(
            r#"{"window_width":28,"window_height":28,"hop":0}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_grid() {
        let spec = WindowSpec::square(32, 10).unwrap();
        assert_eq!(spec.grid(Dimensions::new(100, 100)), (7, 7));
        assert_eq!(spec.grid(Dimensions::new(32, 32)), (1, 1));
        // Width too small collapses the whole grid
        assert_eq!(spec.grid(Dimensions::new(30, 100)), (0, 0));
        assert_eq!(spec.grid(Dimensions::new(320, 240)), (29, 21));
    }

    #[test]
    fn test_rectangle_edges() {
        let rect = Rectangle::new(10, 20, 32, 16);
        assert_eq!(rect.right(), 42);
        assert_eq!(rect.bottom(), 36);
        assert!(rect.within(Dimensions::new(42, 36)));
        assert!(!rect.within(Dimensions::new(41, 36)));
    }
}
