// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines built on the window scan
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ Source dir   │ ──▶ │ Dataset pipeline  │ ──▶ │ {name}_{n}.bmp   │
//! └──────────────┘     └───────────────────┘     └──────────────────┘
//!
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ Frame source │ ──▶ │ Photo pipeline    │ ──▶ │ IMG{n}.bmp       │
//! └──────────────┘     └───────────────────┘     └──────────────────┘
//!
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ Frame        │ ──▶ │ Finder pipeline   │ ──▶ │ Target locations │
//! └──────────────┘     └───────────────────┘     └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: Divide source images into training sub-images
//! - [`photo`]: Button-triggered photo capture and image encoding
//! - [`finder`]: Classify every window of a frame and collect hits

pub mod dataset;
pub mod finder;
pub mod photo;
