//! Error types for the engine.

use std::io;

use thiserror::Error;
use windowscope_capture::CaptureError;
use windowscope_ipc::SettingsError;

/// Errors that can occur while building or controlling an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Settings or monitor config rejected at construction.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] SettingsError),

    /// A frame rate outside the configured bounds.
    #[error("Frame rate {fps} rejected: accepted range is {min}..={max}")]
    ConfigRejected { fps: u32, min: u32, max: u32 },

    /// A worker thread could not be started.
    #[error("Failed to spawn {name} thread: {source}")]
    ThreadSpawn {
        name: &'static str,
        #[source]
        source: io::Error,
    },

    /// Capture backend error.
    #[error(transparent)]
    Capture(#[from] CaptureError),
}
