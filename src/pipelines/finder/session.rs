// SPDX-License-Identifier: GPL-3.0-only

//! Button-armed live search
//!
//! The finder's take on the capture loop. Releasing the button starts a
//! blinking countdown. When it expires the indicator goes dark for a short
//! settle time so it does not light the scene, one frame is taken, and the
//! indicator stays lit while that frame is searched.

use super::{Classifier, FindReport, TargetFinder};
use crate::backends::{Frame, FrameSource};
use crate::config::FinderSettings;
use crate::errors::AppResult;
use crate::pipelines::photo::{Indicator, ShutterState, Trigger};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A searched frame
#[derive(Debug, Clone)]
pub struct Detection {
    pub frame: Frame,
    pub report: FindReport,
}

/// Live search loop tying a frame source, button and indicator to a finder
pub struct FinderSession<S, T, I, C> {
    source: S,
    trigger: T,
    indicator: I,
    shutter: ShutterState,
    led_off_delay: Duration,
    finder: TargetFinder<C>,
}

impl<S, T, I, C> FinderSession<S, T, I, C>
where
    S: FrameSource,
    T: Trigger,
    I: Indicator,
    C: Classifier,
{
    pub fn new(
        source: S,
        trigger: T,
        mut indicator: I,
        finder: TargetFinder<C>,
        shutter_delay: Duration,
        led_off_delay: Duration,
    ) -> Self {
        indicator.set(false);

        Self {
            source,
            trigger,
            indicator,
            shutter: ShutterState::new(shutter_delay),
            led_off_delay,
            finder,
        }
    }

    /// Create a session with the finder and timing from configuration
    pub fn from_settings(
        source: S,
        trigger: T,
        indicator: I,
        classifier: C,
        settings: &FinderSettings,
    ) -> AppResult<Self> {
        let finder = TargetFinder::from_settings(classifier, settings)?;
        Ok(Self::new(
            source,
            trigger,
            indicator,
            finder,
            settings.shutter_delay(),
            settings.led_off_delay(),
        ))
    }

    pub fn is_armed(&self) -> bool {
        self.shutter.is_armed()
    }

    /// Run one loop iteration at time `now`
    ///
    /// Returns the searched frame on the tick the shutter fires. The settle
    /// delay is slept on that tick.
    pub fn tick(&mut self, now: Instant) -> AppResult<Option<Detection>> {
        let pressed = self.trigger.is_pressed();
        let tick = self.shutter.update(pressed, now);

        if let Some(on) = tick.indicator {
            self.indicator.set(on);
        }
        if tick.armed {
            debug!("Search armed");
        }
        if !tick.fire {
            return Ok(None);
        }

        if !self.led_off_delay.is_zero() {
            std::thread::sleep(self.led_off_delay);
        }
        let frame = self.source.snapshot()?;

        self.indicator.set(true);
        let report = self.finder.find(&frame.image);
        self.indicator.set(false);
        let report = report?;

        info!(targets = report.targets.len(), "Live search done");
        Ok(Some(Detection { frame, report }))
    }

    /// Tick every `interval` until `stop` is set
    ///
    /// A countdown already running when `stop` is raised still completes.
    /// Returns how many frames were searched.
    pub fn run(
        &mut self,
        stop: &AtomicBool,
        interval: Duration,
        mut on_detection: impl FnMut(&Detection),
    ) -> AppResult<usize> {
        let mut searched = 0;

        while !stop.load(Ordering::SeqCst) || self.is_armed() {
            if let Some(detection) = self.tick(Instant::now())? {
                on_detection(&detection);
                searched += 1;
            }
            std::thread::sleep(interval);
        }

        self.indicator.set(false);
        Ok(searched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, CaptureError};
    use crate::pipelines::finder::TemplateClassifier;
    use crate::scan::{Rectangle, WindowSpec};
    use image::{Rgb, RgbImage};
    use std::collections::VecDeque;

    struct Script(VecDeque<bool>);

    impl Trigger for Script {
        fn is_pressed(&mut self) -> bool {
            self.0.pop_front().unwrap_or(false)
        }
    }

    #[derive(Default)]
    struct Led(Vec<bool>);

    impl Indicator for Led {
        fn set(&mut self, on: bool) {
            self.0.push(on);
        }
    }

    /// 40x40 black frame with a white 10x10 patch at (10, 20)
    struct Patch;

    impl FrameSource for Patch {
        fn snapshot(&mut self) -> Result<Frame, CaptureError> {
            let mut image = RgbImage::new(40, 40);
            for y in 20..30 {
                for x in 10..20 {
                    image.put_pixel(x, y, Rgb([255, 255, 255]));
                }
            }
            Ok(Frame::new(image))
        }
    }

    struct Dead;

    impl FrameSource for Dead {
        fn snapshot(&mut self) -> Result<Frame, CaptureError> {
            Err(CaptureError::NoFrameAvailable)
        }
    }

    const DELAY: Duration = Duration::from_millis(800);

    fn white_finder() -> TargetFinder<TemplateClassifier> {
        let template = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let spec = WindowSpec::square(10, 10).unwrap();
        TargetFinder::new(TemplateClassifier::new(template), spec, "target", 0.9).unwrap()
    }

    #[test]
    fn test_release_searches_once_after_countdown() {
        let trigger = Script(VecDeque::from(vec![true, false]));
        let mut session = FinderSession::new(
            Patch,
            trigger,
            Led::default(),
            white_finder(),
            DELAY,
            Duration::ZERO,
        );

        let start = Instant::now();
        assert!(session.tick(start).unwrap().is_none());
        assert!(session.tick(start).unwrap().is_none());
        assert!(session.is_armed());
        assert!(
            session
                .tick(start + Duration::from_millis(400))
                .unwrap()
                .is_none()
        );

        let detection = session
            .tick(start + DELAY + Duration::from_millis(1))
            .unwrap()
            .unwrap();
        assert_eq!(detection.report.stats.inferences, 16);
        let hits: Vec<_> = detection.report.targets.iter().map(|t| t.rect).collect();
        assert_eq!(hits, vec![Rectangle::new(10, 20, 10, 10)]);

        // Dark for the snapshot, lit while searching, dark afterwards
        let levels = &session.indicator.0;
        assert_eq!(levels[levels.len() - 3..], [false, true, false]);

        assert!(!session.is_armed());
        assert!(
            session
                .tick(start + DELAY * 3)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_snapshot_error_propagates() {
        let trigger = Script(VecDeque::from(vec![true, false]));
        let mut session = FinderSession::new(
            Dead,
            trigger,
            Led::default(),
            white_finder(),
            DELAY,
            Duration::ZERO,
        );

        let start = Instant::now();
        session.tick(start).unwrap();
        session.tick(start).unwrap();
        let err = session
            .tick(start + DELAY + Duration::from_millis(1))
            .unwrap_err();
        assert!(matches!(err, AppError::Capture(CaptureError::NoFrameAvailable)));
    }

    #[test]
    fn test_from_settings_uses_finder_timing() {
        let settings = FinderSettings::default();
        let template = RgbImage::from_pixel(32, 32, Rgb([255, 255, 255]));
        let mut session = FinderSession::from_settings(
            Patch,
            Script(VecDeque::from(vec![true, false])),
            Led::default(),
            TemplateClassifier::new(template),
            &settings,
        )
        .unwrap();

        let start = Instant::now();
        session.tick(start).unwrap();
        session.tick(start).unwrap();
        // Still counting down at the configured delay
        assert!(
            session
                .tick(start + settings.shutter_delay())
                .unwrap()
                .is_none()
        );
        assert!(session.is_armed());
    }
}
