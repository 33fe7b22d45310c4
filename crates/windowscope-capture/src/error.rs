//! Error types for the capture module.

use std::time::Duration;

use thiserror::Error;
use windowscope_ipc::CaptureMethod;

/// Errors that can occur during capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Windows API error.
    #[error("Windows API error: {message}")]
    WindowsApi {
        message: String,
        #[cfg(windows)]
        #[source]
        source: Option<windows::core::Error>,
    },

    /// The window rectangle collapsed to zero or negative size.
    #[error("Window geometry invalid: {width}x{height}")]
    GeometryInvalid { width: i32, height: i32 },

    /// A single strategy could not produce a frame.
    #[error("{method} capture failed: {reason}")]
    StrategyFailed {
        method: CaptureMethod,
        reason: String,
    },

    /// Every strategy in the chain failed this tick.
    #[error("All capture strategies failed")]
    AllStrategiesFailed,

    /// Native acquisition did not return in time.
    #[error("Capture acquisition timed out after {0:?}")]
    AcquisitionTimeout(Duration),

    /// A previous acquisition is still running.
    #[error("Capture acquisition still in progress")]
    AcquisitionBusy,

    /// Frame conversion error.
    #[error("Frame conversion error: {0}")]
    FrameConversion(String),

    /// Capture source not found.
    #[error("Capture source not found: {0}")]
    SourceNotFound(String),
}

impl CaptureError {
    /// Whether the error means "no strategy could capture this tick".
    pub fn is_capture_unavailable(&self) -> bool {
        matches!(
            self,
            Self::StrategyFailed { .. }
                | Self::AllStrategiesFailed
                | Self::AcquisitionTimeout(_)
                | Self::AcquisitionBusy
        )
    }

    #[cfg(windows)]
    pub(crate) fn windows_api(message: impl Into<String>) -> Self {
        Self::WindowsApi {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for CaptureError {
    fn from(err: windows::core::Error) -> Self {
        Self::WindowsApi {
            message: err.message().to_string(),
            source: Some(err),
        }
    }
}
