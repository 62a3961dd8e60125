// SPDX-License-Identifier: GPL-3.0-only

//! Sliding-window target finder
//!
//! Scans a frame with the same window grid used to build the training set,
//! classifies every window and keeps the ones whose target score reaches the
//! threshold:
//!
//! ```text
//! Frame ─▶ scan ─▶ crop ─▶ Classifier ─▶ score >= threshold? ─▶ TargetLocation
//!                     └──────── timed per window ────────┘
//! ```

pub mod classifier;
pub mod overlay;
pub mod session;
pub mod types;

pub use classifier::{Classifier, TemplateClassifier};
pub use session::{Detection, FinderSession};
pub use types::{FindRecord, FindReport, InferenceStats, TargetLocation};

use crate::config::FinderSettings;
use crate::errors::{AppResult, ClassifierError};
use crate::scan::{Dimensions, WindowScanner, WindowSpec};
use image::RgbImage;
use image::imageops;
use std::time::Instant;
use tracing::{debug, info, trace};

/// Runs a classifier over every window of a frame
pub struct TargetFinder<C> {
    classifier: C,
    scanner: WindowScanner,
    threshold: f32,
    target_index: usize,
}

impl<C: Classifier> TargetFinder<C> {
    /// Create a finder looking for `target_label`
    ///
    /// Fails when the classifier has no such label.
    pub fn new(
        classifier: C,
        spec: WindowSpec,
        target_label: &str,
        threshold: f32,
    ) -> Result<Self, ClassifierError> {
        let target_index = classifier
            .labels()
            .iter()
            .position(|l| l == target_label)
            .ok_or_else(|| ClassifierError::UnknownLabel(target_label.to_string()))?;

        Ok(Self {
            classifier,
            scanner: WindowScanner::new(spec),
            threshold,
            target_index,
        })
    }

    /// Create a finder from configuration
    ///
    /// The settings are validated first, so overrides applied after the
    /// config file was loaded are checked too.
    pub fn from_settings(classifier: C, settings: &FinderSettings) -> AppResult<Self> {
        settings.validate()?;
        let spec = settings.window_spec()?;
        Ok(Self::new(
            classifier,
            spec,
            &settings.target_label,
            settings.threshold,
        )?)
    }

    /// Search one frame
    pub fn find(&mut self, frame: &RgbImage) -> Result<FindReport, ClassifierError> {
        let dimensions = Dimensions::new(frame.width(), frame.height());
        let expected = self.classifier.labels().len();
        let mut targets = Vec::new();
        let mut stats = InferenceStats::default();

        info!(
            width = dimensions.width,
            height = dimensions.height,
            windows = self.scanner.count(dimensions),
            "Searching frame"
        );

        for rect in self.scanner.scan(dimensions) {
            let start = Instant::now();

            let window =
                imageops::crop_imm(frame, rect.left, rect.top, rect.width, rect.height).to_image();
            let scores = self.classifier.classify(&window)?;
            if scores.len() != expected {
                return Err(ClassifierError::ScoreCountMismatch {
                    expected,
                    actual: scores.len(),
                });
            }

            let score = scores[self.target_index];
            if score >= self.threshold {
                debug!(left = rect.left, top = rect.top, score, "Possible target");
                targets.push(TargetLocation { rect, score });
            }

            stats.record(start.elapsed());
            trace!(left = rect.left, top = rect.top, score, "Window classified");
        }

        info!(
            targets = targets.len(),
            inferences = stats.inferences,
            average_ms = stats.average_ms(),
            "Search complete"
        );

        Ok(FindReport {
            frame: dimensions,
            spec: self.scanner.spec(),
            threshold: self.threshold,
            targets,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Scores a window by its top-left red value
    struct RedProbe {
        labels: Vec<String>,
    }

    impl RedProbe {
        fn new() -> Self {
            Self {
                labels: vec!["background".to_string(), "target".to_string()],
            }
        }
    }

    impl Classifier for RedProbe {
        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn classify(&mut self, window: &RgbImage) -> Result<Vec<f32>, ClassifierError> {
            let red = window.get_pixel(0, 0)[0] as f32 / 255.0;
            Ok(vec![1.0 - red, red])
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn labels(&self) -> &[String] {
            &[]
        }

        fn classify(&mut self, _window: &RgbImage) -> Result<Vec<f32>, ClassifierError> {
            Ok(vec![1.0])
        }
    }

    #[test]
    fn test_unknown_label() {
        let spec = WindowSpec::square(4, 4).unwrap();
        let err = TargetFinder::new(RedProbe::new(), spec, "lego", 0.5).err();
        assert_eq!(err, Some(ClassifierError::UnknownLabel("lego".to_string())));
    }

    #[test]
    fn test_hits_above_threshold_in_scan_order() {
        // Red only at window origins (10,0) and (0,10)
        let mut frame = RgbImage::new(40, 40);
        frame.put_pixel(10, 0, Rgb([255, 0, 0]));
        frame.put_pixel(0, 10, Rgb([200, 0, 0]));
        frame.put_pixel(20, 20, Rgb([100, 0, 0]));

        let spec = WindowSpec::square(16, 10).unwrap();
        let mut finder = TargetFinder::new(RedProbe::new(), spec, "target", 0.7).unwrap();
        let report = finder.find(&frame).unwrap();

        assert_eq!(report.stats.inferences, 9);
        let origins: Vec<_> = report
            .targets
            .iter()
            .map(|t| (t.rect.left, t.rect.top))
            .collect();
        assert_eq!(origins, vec![(10, 0), (0, 10)]);
        assert_eq!(report.targets[0].score, 1.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let frame = RgbImage::from_pixel(4, 4, Rgb([255, 0, 0]));
        let spec = WindowSpec::square(4, 1).unwrap();
        let mut finder = TargetFinder::new(RedProbe::new(), spec, "target", 1.0).unwrap();
        assert_eq!(finder.find(&frame).unwrap().targets.len(), 1);
    }

    #[test]
    fn test_frame_smaller_than_window() {
        let spec = WindowSpec::square(32, 10).unwrap();
        let mut finder = TargetFinder::new(RedProbe::new(), spec, "target", 0.1).unwrap();
        let report = finder.find(&RgbImage::new(20, 100)).unwrap();
        assert!(report.targets.is_empty());
        assert_eq!(report.stats.inferences, 0);
    }

    #[test]
    fn test_score_count_checked() {
        struct OneLabel(Vec<String>);
        impl Classifier for OneLabel {
            fn labels(&self) -> &[String] {
                &self.0
            }
            fn classify(&mut self, _window: &RgbImage) -> Result<Vec<f32>, ClassifierError> {
                Ok(vec![0.5, 0.5])
            }
        }

        let spec = WindowSpec::square(2, 2).unwrap();
        let mut finder =
            TargetFinder::new(OneLabel(vec!["target".to_string()]), spec, "target", 0.5).unwrap();
        let err = finder.find(&RgbImage::new(4, 4)).unwrap_err();
        assert_eq!(
            err,
            ClassifierError::ScoreCountMismatch {
                expected: 1,
                actual: 2
            }
        );

        assert!(TargetFinder::new(Broken, spec, "target", 0.5).is_err());
    }

    #[test]
    fn test_from_settings_validates_threshold() {
        let mut settings = FinderSettings::default();
        settings.threshold = 5.0;
        assert!(TargetFinder::from_settings(RedProbe::new(), &settings).is_err());

        settings.threshold = f32::NAN;
        assert!(TargetFinder::from_settings(RedProbe::new(), &settings).is_err());

        settings.threshold = 0.7;
        assert!(TargetFinder::from_settings(RedProbe::new(), &settings).is_ok());
    }
}
