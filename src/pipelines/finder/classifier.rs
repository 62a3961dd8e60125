// SPDX-License-Identifier: GPL-3.0-only

//! Window classifiers
//!
//! The finder only needs a score per label for each window. Any model can
//! sit behind [`Classifier`]; [`TemplateClassifier`] is a small built-in one
//! that compares windows against a reference picture of the target.

use crate::errors::ClassifierError;
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Scores a window against a fixed set of labels
pub trait Classifier {
    /// Labels, in the order scores are returned
    fn labels(&self) -> &[String];

    /// One score per label for `window`, each in `0.0..=1.0`
    fn classify(&mut self, window: &RgbImage) -> Result<Vec<f32>, ClassifierError>;
}

/// Labels of the built-in template classifier
pub const TEMPLATE_LABELS: [&str; 2] = ["background", "target"];

/// Similarity to a reference image
///
/// The target score is `1 - mean absolute difference / 255` over all RGB
/// samples, with the template resized to the window; the background score is
/// its complement.
pub struct TemplateClassifier {
    labels: Vec<String>,
    template: RgbImage,
    resized: Option<RgbImage>,
}

impl TemplateClassifier {
    pub fn new(template: RgbImage) -> Self {
        Self {
            labels: TEMPLATE_LABELS.iter().map(|l| l.to_string()).collect(),
            template,
            resized: None,
        }
    }

    fn template_for(&mut self, width: u32, height: u32) -> &RgbImage {
        if self.template.dimensions() == (width, height) {
            return &self.template;
        }

        let stale = match &self.resized {
            Some(t) => t.dimensions() != (width, height),
            None => true,
        };
        if stale {
            self.resized = Some(imageops::resize(
                &self.template,
                width,
                height,
                FilterType::Triangle,
            ));
        }

        match &self.resized {
            Some(t) => t,
            None => &self.template,
        }
    }
}

impl Classifier for TemplateClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn classify(&mut self, window: &RgbImage) -> Result<Vec<f32>, ClassifierError> {
        let (width, height) = window.dimensions();
        if width == 0 || height == 0 {
            return Err(ClassifierError::Failed("empty window".to_string()));
        }

        let template = self.template_for(width, height);
        let diff: u64 = window
            .as_raw()
            .iter()
            .zip(template.as_raw())
            .map(|(a, b)| u64::from(a.abs_diff(*b)))
            .sum();
        let samples = window.as_raw().len() as f64;
        let similarity = (1.0 - diff as f64 / (samples * 255.0)) as f32;

        Ok(vec![1.0 - similarity, similarity])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_identical_window_scores_one() {
        let template = RgbImage::from_pixel(4, 4, Rgb([200, 10, 10]));
        let mut classifier = TemplateClassifier::new(template.clone());
        let scores = classifier.classify(&template).unwrap();
        assert_eq!(scores, vec![0.0, 1.0]);
    }

    #[test]
    fn test_opposite_window_scores_zero() {
        let mut classifier = TemplateClassifier::new(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));
        let scores = classifier
            .classify(&RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])))
            .unwrap();
        assert_eq!(scores, vec![1.0, 0.0]);
    }

    #[test]
    fn test_template_resized_to_window() {
        let mut classifier =
            TemplateClassifier::new(RgbImage::from_pixel(64, 64, Rgb([120, 120, 120])));
        let scores = classifier
            .classify(&RgbImage::from_pixel(8, 8, Rgb([120, 120, 120])))
            .unwrap();
        assert!(scores[1] > 0.99);
        assert_eq!(classifier.labels(), ["background", "target"]);
    }
}
