// SPDX-License-Identifier: GPL-3.0-only

//! tilecam - sliding-window dataset and camera tools
//!
//! This library provides the pieces behind the `tilecam` command: dividing
//! images into training sub-images, capturing numbered photos, and scanning
//! frames for a target with a window classifier.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`scan`]: Sliding-window rectangle enumeration shared by every tool
//! - [`pipelines`]: Dataset division, photo capture and target finding
//! - [`backends`]: Frame sources
//! - [`storage`]: Output directory setup and file naming
//! - [`config`]: Tool configuration
//!
//! # Example
//!
//! ```
//! use tilecam::scan::{Dimensions, WindowSpec, scan};
//!
//! let spec = WindowSpec::square(32, 10).unwrap();
//! let windows: Vec<_> = scan(Dimensions::new(100, 100), spec).collect();
//! assert_eq!(windows.len(), 49);
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod scan;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use constants::OutputFormat;
pub use errors::{AppError, AppResult};
pub use scan::{Dimensions, Rectangle, WindowScanner, WindowSpec};
