// SPDX-License-Identifier: GPL-3.0-only

//! Sliding-window scanning
//!
//! Enumerates the crop rectangles of a fixed-size window stepped over an
//! image by a hop distance:
//!
//! ```text
//! (0,0) (hop,0) (2*hop,0) ...   row 0, left to right
//! (0,hop) (hop,hop) ...         row 1
//! ...
//! ```
//!
//! Each axis stops as soon as a full window no longer fits. Trailing pixels
//! that cannot hold a whole window are left out; windows are never clipped
//! or padded. Dataset division and the target finder share this scan, so
//! both place windows at identical coordinates.

pub mod types;

pub use types::{Dimensions, Rectangle, WindowSpec};

use std::iter::FusedIterator;

/// Scan `dimensions` with `spec`
///
/// Returns a lazy, row-major sequence of rectangles. The sequence is empty
/// when the window is larger than the image on either axis.
pub fn scan(dimensions: Dimensions, spec: WindowSpec) -> Windows {
    Windows::new(dimensions, spec)
}

/// Reusable scanner bound to one window configuration
///
/// Holds no cursor between calls; every `scan` starts at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowScanner {
    spec: WindowSpec,
}

impl WindowScanner {
    pub fn new(spec: WindowSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> WindowSpec {
        self.spec
    }

    /// Scan an image of the given extent
    pub fn scan(&self, dimensions: Dimensions) -> Windows {
        Windows::new(dimensions, self.spec)
    }

    /// Number of windows a scan over `dimensions` yields
    pub fn count(&self, dimensions: Dimensions) -> u64 {
        let (columns, rows) = self.spec.grid(dimensions);
        u64::from(columns) * u64::from(rows)
    }
}

/// Iterator over the windows of one scan
///
/// Cloning restarts nothing; it forks the iterator at its current position.
/// Call [`scan`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Windows {
    spec: WindowSpec,
    columns: u32,
    front: u64,
    back: u64,
}

impl Windows {
    fn new(dimensions: Dimensions, spec: WindowSpec) -> Self {
        let (columns, rows) = spec.grid(dimensions);
        Self {
            spec,
            columns,
            front: 0,
            back: u64::from(columns) * u64::from(rows),
        }
    }

    fn rect_at(&self, index: u64) -> Rectangle {
        let columns = u64::from(self.columns);
        // Both quotients are bounded by the grid size, which fits in u32
        let column = (index % columns) as u32;
        let row = (index / columns) as u32;
        Rectangle::new(
            column * self.spec.hop(),
            row * self.spec.hop(),
            self.spec.window_width(),
            self.spec.window_height(),
        )
    }

    fn remaining(&self) -> u64 {
        self.back - self.front
    }
}

impl Iterator for Windows {
    type Item = Rectangle;

    fn next(&mut self) -> Option<Rectangle> {
        if self.front >= self.back {
            return None;
        }
        let rect = self.rect_at(self.front);
        self.front += 1;
        Some(rect)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }

    fn nth(&mut self, n: usize) -> Option<Rectangle> {
        let skip = u64::try_from(n).unwrap_or(u64::MAX);
        self.front = self.front.saturating_add(skip).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for Windows {
    fn next_back(&mut self) -> Option<Rectangle> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.rect_at(self.back))
    }
}

impl ExactSizeIterator for Windows {}

impl FusedIterator for Windows {}
