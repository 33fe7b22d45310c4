//! Engine state machine types.

use serde::{Deserialize, Serialize};

use crate::types::CaptureMethod;

/// Lifecycle state of a capture engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No schedule is active.
    #[default]
    Stopped,

    /// Ticks fire at the configured frame rate.
    Running,

    /// Schedule cancelled, counters and history kept.
    Paused,
}

impl EngineState {
    /// Returns true if the engine is stopped.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if ticks are being scheduled.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true if the engine is paused.
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Returns a simple string representation of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Running => "Running",
            Self::Paused => "Paused",
        }
    }
}

/// Point-in-time snapshot of an engine's status and counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Lifecycle state.
    pub state: EngineState,

    /// Configured frames per second.
    pub target_fps: u32,

    /// Measured frames per second over the last second.
    pub actual_fps: f32,

    /// Tick attempts since the engine was created, failures included.
    pub capture_count: u64,

    /// Failed ticks since the last successful one.
    pub consecutive_failures: u32,

    /// Frames handed to the viewer.
    pub frames_delivered: u64,

    /// Strategy that produced the most recent frame.
    pub current_method: Option<CaptureMethod>,
}
