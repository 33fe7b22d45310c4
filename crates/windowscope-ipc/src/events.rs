//! Events sent from the engine to the viewer.

use crate::frame::Frame;
use crate::state::{EngineState, EngineStatus};
use crate::types::{CaptureMethod, FailureKind};

/// Events that a capture engine publishes, in tick order.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A cropped frame is ready.
    FrameCaptured {
        /// The cropped image.
        frame: Frame,

        /// Delivery number, 1 for the first frame of the engine.
        sequence: u64,
    },

    /// Measured frame rate changed.
    FpsUpdated(f32),

    /// A different strategy produced this tick's frame.
    MethodChanged(CaptureMethod),

    /// Capture has been failing past the escalation threshold.
    CaptureFailed {
        /// Classification of the failure.
        kind: FailureKind,

        /// User-facing diagnostic.
        message: String,
    },

    /// Engine lifecycle state has changed.
    StateChanged {
        previous: EngineState,
        current: EngineState,
    },

    /// Reply to a status request.
    Status(EngineStatus),

    /// The command loop has exited.
    Shutdown,
}

impl EngineEvent {
    /// Build a capture-failed event with the standard diagnostic.
    pub fn capture_failed(kind: FailureKind) -> Self {
        Self::CaptureFailed {
            kind,
            message: kind.message().to_string(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FrameCaptured { .. } => "FrameCaptured",
            Self::FpsUpdated(_) => "FpsUpdated",
            Self::MethodChanged(_) => "MethodChanged",
            Self::CaptureFailed { .. } => "CaptureFailed",
            Self::StateChanged { .. } => "StateChanged",
            Self::Status(_) => "Status",
            Self::Shutdown => "Shutdown",
        }
    }

    /// Whether a later tick supersedes this event, so it may be dropped
    /// when the viewer falls behind.
    pub fn is_droppable(&self) -> bool {
        matches!(
            self,
            Self::FrameCaptured { .. } | Self::FpsUpdated(_) | Self::CaptureFailed { .. }
        )
    }
}
