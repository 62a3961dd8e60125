// SPDX-License-Identifier: GPL-3.0-only

//! Button-triggered photo capture
//!
//! Releasing the button arms the shutter. While the countdown runs the
//! indicator blinks once per tick; when it expires the indicator goes dark,
//! a frame is taken and saved under the first free `{prefix}{n}{suffix}`
//! name in the output directory.

use super::encoding::PhotoEncoder;
use crate::backends::FrameSource;
use crate::config::CaptureSettings;
use crate::errors::CaptureError;
use crate::storage;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Physical or emulated shutter button
pub trait Trigger {
    /// Current button level (`true` while held down)
    fn is_pressed(&mut self) -> bool;
}

/// Status light shown during the countdown
pub trait Indicator {
    fn set(&mut self, on: bool);
}

/// What the shutter wants done on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShutterTick {
    /// New indicator level, if it changes
    pub indicator: Option<bool>,
    /// Take and save a photo now
    pub fire: bool,
    /// The button was released this tick and a countdown started
    pub armed: bool,
}

/// Shutter countdown state machine
///
/// Driven once per loop iteration with the button level and the current
/// time; it never sleeps itself.
#[derive(Debug, Clone)]
pub struct ShutterState {
    delay: Duration,
    armed_at: Option<Instant>,
    was_pressed: bool,
    blink: bool,
}

impl ShutterState {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            armed_at: None,
            was_pressed: false,
            blink: true,
        }
    }

    /// A countdown is running
    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Advance by one tick
    ///
    /// The countdown is serviced before the button so a release on the same
    /// tick a shot fires starts a fresh countdown.
    pub fn update(&mut self, pressed: bool, now: Instant) -> ShutterTick {
        let mut tick = ShutterTick::default();

        if let Some(armed_at) = self.armed_at {
            if now.saturating_duration_since(armed_at) <= self.delay {
                self.blink = !self.blink;
                tick.indicator = Some(self.blink);
            } else {
                self.armed_at = None;
                tick.indicator = Some(false);
                tick.fire = true;
            }
        }

        if self.was_pressed && !pressed {
            self.armed_at = Some(now);
            tick.armed = true;
        }
        self.was_pressed = pressed;

        tick
    }
}

/// Capture loop tying a frame source, button and indicator together
pub struct CaptureSession<S, T, I> {
    source: S,
    trigger: T,
    indicator: I,
    shutter: ShutterState,
    encoder: PhotoEncoder,
    output_dir: PathBuf,
    prefix: String,
    suffix: String,
    next_number: u64,
}

impl<S, T, I> CaptureSession<S, T, I>
where
    S: FrameSource,
    T: Trigger,
    I: Indicator,
{
    /// Create a session saving into `output_dir`
    pub fn new(
        source: S,
        trigger: T,
        mut indicator: I,
        output_dir: &Path,
        settings: &CaptureSettings,
    ) -> Result<Self, CaptureError> {
        let encoder = PhotoEncoder::for_suffix(&settings.file_suffix)
            .ok_or_else(|| CaptureError::UnsupportedSuffix(settings.file_suffix.clone()))?;

        indicator.set(false);

        Ok(Self {
            source,
            trigger,
            indicator,
            shutter: ShutterState::new(settings.shutter_delay()),
            encoder,
            output_dir: output_dir.to_path_buf(),
            prefix: settings.file_prefix.clone(),
            suffix: settings.file_suffix.clone(),
            next_number: 0,
        })
    }

    /// Path the next photo will be saved to
    pub fn next_path(&self) -> PathBuf {
        storage::next_free_path(&self.output_dir, &self.prefix, &self.suffix, self.next_number).1
    }

    pub fn is_armed(&self) -> bool {
        self.shutter.is_armed()
    }

    /// Run one loop iteration at time `now`
    ///
    /// Returns the path of the photo saved on this tick, if any.
    pub fn tick(&mut self, now: Instant) -> Result<Option<PathBuf>, CaptureError> {
        let pressed = self.trigger.is_pressed();
        let tick = self.shutter.update(pressed, now);

        if let Some(on) = tick.indicator {
            self.indicator.set(on);
        }
        if tick.armed {
            debug!(next = %self.next_path().display(), "Shutter armed");
        }
        if !tick.fire {
            return Ok(None);
        }

        let frame = self.source.snapshot()?;
        let (number, path) =
            storage::next_free_path(&self.output_dir, &self.prefix, &self.suffix, self.next_number);

        self.encoder
            .save(&DynamicImage::ImageRgb8(frame.image), &path)
            .map_err(|e| CaptureError::SaveFailed(format!("{}: {}", path.display(), e)))?;
        self.next_number = number + 1;

        info!(path = %path.display(), "Image saved");
        Ok(Some(path))
    }

    /// Tick every `interval` until `stop` is set
    ///
    /// A countdown already running when `stop` is raised still completes.
    /// Returns every saved path in order.
    pub fn run(
        &mut self,
        stop: &AtomicBool,
        interval: Duration,
        mut on_saved: impl FnMut(&Path),
    ) -> Result<Vec<PathBuf>, CaptureError> {
        let mut saved = Vec::new();

        while !stop.load(Ordering::SeqCst) || self.is_armed() {
            if let Some(path) = self.tick(Instant::now())? {
                on_saved(&path);
                saved.push(path);
            }
            std::thread::sleep(interval);
        }

        self.indicator.set(false);
        Ok(saved)
    }
}
