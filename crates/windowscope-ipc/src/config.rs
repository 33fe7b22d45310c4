//! Capture configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Rect, WindowHandle};

/// A configuration value that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Frame-rate bounds are inconsistent.
    #[error("Invalid fps bounds: min={min}, max={max}")]
    FpsBounds { min: u32, max: u32 },

    /// A requested frame rate lies outside the bounds.
    #[error("Frame rate {fps} outside {min}..={max}")]
    FpsOutOfRange { fps: u32, min: u32, max: u32 },

    /// A region is smaller than the minimum or starts off-window.
    #[error("Invalid capture region {region}: {reason}")]
    Region { region: Rect, reason: String },

    /// A field that must be non-zero is zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Static capture settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Frame rate used when a monitor config does not name one.
    pub default_fps: u32,

    /// Lowest accepted frame rate.
    pub min_fps: u32,

    /// Highest accepted frame rate.
    pub max_fps: u32,

    /// Smallest region edge, in pixels.
    pub min_region_size: i32,

    /// Log tick details every N ticks.
    pub verbose_log_interval: u64,

    /// Consecutive failures tolerated silently before diagnostics are emitted.
    pub failure_escalation_threshold: u32,

    /// Upper bound for a single native acquisition, in milliseconds.
    pub acquisition_timeout_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            default_fps: 30,
            min_fps: 1,
            max_fps: 60,
            min_region_size: 10,
            verbose_log_interval: 30,
            failure_escalation_threshold: 5,
            acquisition_timeout_ms: 1000,
        }
    }
}

impl CaptureSettings {
    /// Check that the settings are internally consistent.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_fps == 0 || self.min_fps > self.max_fps {
            return Err(SettingsError::FpsBounds {
                min: self.min_fps,
                max: self.max_fps,
            });
        }
        self.check_fps(self.default_fps)?;
        if self.verbose_log_interval == 0 {
            return Err(SettingsError::Zero("verbose_log_interval"));
        }
        if self.acquisition_timeout_ms == 0 {
            return Err(SettingsError::Zero("acquisition_timeout_ms"));
        }
        Ok(())
    }

    /// Whether `fps` lies within `min_fps..=max_fps`.
    pub fn accepts_fps(&self, fps: u32) -> bool {
        (self.min_fps..=self.max_fps).contains(&fps)
    }

    /// Check a frame rate against the configured bounds.
    pub fn check_fps(&self, fps: u32) -> Result<(), SettingsError> {
        if self.accepts_fps(fps) {
            Ok(())
        } else {
            Err(SettingsError::FpsOutOfRange {
                fps,
                min: self.min_fps,
                max: self.max_fps,
            })
        }
    }

    /// Check a region chosen by the viewer.
    pub fn check_region(&self, region: Rect) -> Result<(), SettingsError> {
        if region.x < 0 || region.y < 0 {
            return Err(SettingsError::Region {
                region,
                reason: "origin must be inside the window".to_string(),
            });
        }
        if region.width < self.min_region_size || region.height < self.min_region_size {
            return Err(SettingsError::Region {
                region,
                reason: format!("edges must be at least {}px", self.min_region_size),
            });
        }
        Ok(())
    }

    /// Acquisition timeout as a duration.
    pub fn acquisition_timeout(&self) -> Duration {
        Duration::from_millis(self.acquisition_timeout_ms)
    }
}

/// What to monitor: a window, an optional region of it, and a frame rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Target window.
    pub window: WindowHandle,

    /// Region in window coordinates; `None` delivers the full window.
    #[serde(default)]
    pub region: Option<Rect>,

    /// Target frame rate; `None` uses the default.
    #[serde(default)]
    pub fps: Option<u32>,
}

impl MonitorConfig {
    /// Monitor the full window at the default frame rate.
    pub fn new(window: WindowHandle) -> Self {
        Self {
            window,
            region: None,
            fps: None,
        }
    }

    /// Restrict delivery to a region.
    pub fn with_region(mut self, region: Rect) -> Self {
        self.region = Some(region);
        self
    }

    /// Set the target frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Validate against `settings` and return the effective frame rate.
    pub fn resolve(&self, settings: &CaptureSettings) -> Result<u32, SettingsError> {
        settings.validate()?;
        if let Some(region) = self.region {
            settings.check_region(region)?;
        }
        let fps = self.fps.unwrap_or(settings.default_fps);
        settings.check_fps(fps)?;
        Ok(fps)
    }
}
