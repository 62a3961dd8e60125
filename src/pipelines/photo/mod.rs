// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture pipeline
//!
//! ```text
//! Button ─▶ Shutter countdown ─▶ Snapshot ─▶ Encoding ─▶ IMG{n}.bmp
//!               │
//!               └─▶ Indicator blink
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Trigger**: Button release arms the shutter
//! 2. **Countdown**: Indicator blinks until the shutter delay passes
//! 3. **Capture**: One frame is pulled from the frame source
//! 4. **Disk I/O**: Saved under the first unused file number

pub mod capture;
pub mod encoding;

pub use capture::{CaptureSession, Indicator, ShutterState, ShutterTick, Trigger};
pub use encoding::PhotoEncoder;
