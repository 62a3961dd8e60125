// SPDX-License-Identifier: GPL-3.0-only

//! Tool configuration
//!
//! Settings live in a JSON file, by default
//! `$XDG_CONFIG_HOME/tilecam/config.json`. A missing file means defaults;
//! any field left out of the file keeps its default.

use crate::constants::{self, OutputFormat, capture, file_formats, finder};
use crate::errors::{AppError, AppResult, ScanError};
use crate::scan::{Dimensions, WindowSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Dataset division settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DivideSettings {
    /// Suffix appended to every tile file name (selects the image format)
    pub file_suffix: String,
}

impl Default for DivideSettings {
    fn default() -> Self {
        Self {
            file_suffix: file_formats::DEFAULT_SUFFIX.to_string(),
        }
    }
}

/// Photo capture settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Prefix of captured photo files
    pub file_prefix: String,
    /// Suffix of captured photo files
    pub file_suffix: String,
    /// Milliseconds between button release and the shutter
    pub shutter_delay_ms: u64,
    /// Milliseconds between capture loop ticks
    pub tick_interval_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            file_prefix: capture::DEFAULT_PREFIX.to_string(),
            file_suffix: file_formats::DEFAULT_SUFFIX.to_string(),
            shutter_delay_ms: capture::SHUTTER_DELAY.as_millis() as u64,
            tick_interval_ms: capture::TICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl CaptureSettings {
    pub fn shutter_delay(&self) -> Duration {
        Duration::from_millis(self.shutter_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Target finder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderSettings {
    /// Label whose score decides a hit
    pub target_label: String,
    /// Minimum score for a hit
    pub threshold: f32,
    pub window_width: u32,
    pub window_height: u32,
    pub hop: u32,
    /// Centered window taken from each frame before scanning
    pub frame_width: u32,
    pub frame_height: u32,
    /// Live mode: milliseconds between button release and the snapshot
    pub shutter_delay_ms: u64,
    /// Live mode: milliseconds the indicator is dark before the snapshot
    pub led_off_delay_ms: u64,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            target_label: finder::TARGET_LABEL.to_string(),
            threshold: finder::THRESHOLD,
            window_width: finder::WINDOW_WIDTH,
            window_height: finder::WINDOW_HEIGHT,
            hop: finder::HOP,
            frame_width: finder::FRAME_WIDTH,
            frame_height: finder::FRAME_HEIGHT,
            shutter_delay_ms: finder::SHUTTER_DELAY.as_millis() as u64,
            led_off_delay_ms: finder::LED_OFF_DELAY.as_millis() as u64,
        }
    }
}

impl FinderSettings {
    /// Window spec built from the configured window size and hop
    pub fn window_spec(&self) -> Result<WindowSpec, ScanError> {
        WindowSpec::new(self.window_width, self.window_height, self.hop)
    }

    pub fn frame_dimensions(&self) -> Dimensions {
        Dimensions::new(self.frame_width, self.frame_height)
    }

    pub fn shutter_delay(&self) -> Duration {
        Duration::from_millis(self.shutter_delay_ms)
    }

    pub fn led_off_delay(&self) -> Duration {
        Duration::from_millis(self.led_off_delay_ms)
    }

    /// Check the window spec, threshold and frame size
    ///
    /// A NaN threshold is rejected along with anything outside `0..=1`.
    pub fn validate(&self) -> AppResult<()> {
        self.window_spec()?;

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AppError::Config(format!(
                "Threshold must be between 0 and 1, got {}",
                self.threshold
            )));
        }

        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(AppError::Config(format!(
                "Frame size must be positive, got {}x{}",
                self.frame_width, self.frame_height
            )));
        }

        Ok(())
    }
}

/// Complete tool configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub divide: DivideSettings,
    pub capture: CaptureSettings,
    pub finder: FinderSettings,
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(constants::APP_NAME).join("config.json"))
    }

    /// Load configuration from `path`, or from the default location
    ///
    /// A missing file yields the defaults. An explicitly given path that does
    /// not exist is an error.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => {
                    debug!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            if explicit {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(text: &str) -> AppResult<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that would otherwise only fail mid-run
    pub fn validate(&self) -> AppResult<()> {
        self.finder.validate()?;

        for suffix in [&self.divide.file_suffix, &self.capture.file_suffix] {
            if OutputFormat::from_suffix(suffix).is_none() {
                return Err(AppError::Config(format!(
                    "Unsupported file suffix: {}",
                    suffix
                )));
            }
        }

        Ok(())
    }
}
