//! Capture engine for windowscope.
//!
//! This crate turns a window handle and a region into a stream of cropped
//! frames. A scheduler thread drives one capture attempt per tick; failures
//! are counted and escalated into diagnostics once they persist.

mod acquisition;
mod error;
mod failure;
mod metrics;
mod orchestrator;
mod scheduler;
mod session;

pub use acquisition::Acquisition;
pub use error::EngineError;
pub use failure::FailureClassifier;
pub use metrics::{FpsMeter, SessionStats, FPS_WINDOW};
pub use orchestrator::CaptureEngine;
pub use scheduler::tick_interval;
pub use session::{CaptureSession, TickOutcome, TickReport};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(windows)]
use crossbeam_channel::Sender;
#[cfg(windows)]
use windowscope_capture::CaptureError;
#[cfg(windows)]
use windowscope_ipc::{CaptureSettings, EngineEvent, MonitorConfig};

/// Create an engine for a live window using the GDI capture chain.
///
/// Any existing window is accepted, including untitled and hidden ones.
#[cfg(windows)]
pub fn create_engine(
    config: MonitorConfig,
    settings: CaptureSettings,
    event_tx: Sender<EngineEvent>,
) -> EngineResult<CaptureEngine> {
    if !windowscope_capture::window_exists(config.window) {
        return Err(CaptureError::SourceNotFound(config.window.to_string()).into());
    }
    CaptureEngine::new(
        config,
        settings,
        std::sync::Arc::new(windowscope_capture::Win32Geometry),
        windowscope_capture::default_chain(),
        event_tx,
    )
}
