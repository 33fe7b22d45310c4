//! Application configuration file.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use windowscope_ipc::{CaptureSettings, MonitorConfig, Rect, WindowHandle};

/// Contents of the JSON config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window, region and frame rate to monitor.
    pub monitor: MonitorConfig,

    /// Engine settings; missing fields take their defaults.
    #[serde(default)]
    pub settings: CaptureSettings,
}

impl AppConfig {
    /// Parse and validate a config document.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text).context("Malformed config JSON")?;
        config
            .monitor
            .resolve(&config.settings)
            .context("Invalid monitor configuration")?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In config file {}", path.display()))
    }

    /// Config printed by `--gen-config`.
    pub fn example() -> Self {
        Self {
            monitor: MonitorConfig::new(WindowHandle(0))
                .with_region(Rect::new(0, 0, 640, 360))
                .with_fps(30),
            settings: CaptureSettings::default(),
        }
    }
}
