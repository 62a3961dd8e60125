// SPDX-License-Identifier: GPL-3.0-only

//! Result types of a target search

use crate::scan::{Dimensions, Rectangle, WindowSpec};
use serde::Serialize;
use std::time::Duration;

/// A window whose target score reached the threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetLocation {
    pub rect: Rectangle,
    pub score: f32,
}

impl TargetLocation {
    /// Score rounded to two decimals for overlays and console output
    pub fn score_label(&self) -> String {
        format!("{:.2}", self.score)
    }
}

/// Classification timing for one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InferenceStats {
    /// Windows classified
    pub inferences: u64,
    /// Time spent cropping and classifying, summed over all windows
    pub total: Duration,
}

impl InferenceStats {
    pub fn record(&mut self, elapsed: Duration) {
        self.inferences += 1;
        self.total += elapsed;
    }

    /// Mean time per window in milliseconds (zero when nothing ran)
    pub fn average_ms(&self) -> f64 {
        if self.inferences == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / self.inferences as f64
        }
    }

    pub fn total_secs(&self) -> f64 {
        self.total.as_secs_f64()
    }
}

/// Everything one search produced
#[derive(Debug, Clone, PartialEq)]
pub struct FindReport {
    /// Extent of the scanned frame
    pub frame: Dimensions,
    pub spec: WindowSpec,
    pub threshold: f32,
    /// Hits in scan order
    pub targets: Vec<TargetLocation>,
    pub stats: InferenceStats,
}

impl FindReport {
    /// Console summary, one line per figure
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Number of possible targets found: {}", self.targets.len()),
            format!("Average inference time: {:.3} ms", self.stats.average_ms()),
            format!("Number of inferences performed: {}", self.stats.inferences),
            format!("Total computation time: {:.3} s", self.stats.total_secs()),
        ]
    }

    /// Serializable form of the report, stamped with `generated_at`
    pub fn to_record(&self, generated_at: String) -> FindRecord {
        FindRecord {
            generated_at,
            frame: self.frame,
            spec: self.spec,
            threshold: self.threshold,
            targets: self.targets.clone(),
            inferences: self.stats.inferences,
            average_inference_ms: self.stats.average_ms(),
            total_secs: self.stats.total_secs(),
        }
    }
}

/// JSON layout of a saved report
#[derive(Debug, Clone, Serialize)]
pub struct FindRecord {
    pub generated_at: String,
    pub frame: Dimensions,
    pub spec: WindowSpec,
    pub threshold: f32,
    pub targets: Vec<TargetLocation>,
    pub inferences: u64,
    pub average_inference_ms: f64,
    pub total_secs: f64,
}
