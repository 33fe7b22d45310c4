//! Typed engine<->viewer messages for windowscope.
//!
//! This crate defines the data shared between a capture engine and the
//! viewer that consumes its frames: geometry, frames, configuration,
//! control commands and events.

mod commands;
mod config;
mod events;
mod frame;
mod state;
mod types;

pub use commands::EngineCommand;
pub use config::{CaptureSettings, MonitorConfig, SettingsError};
pub use events::EngineEvent;
pub use frame::{Frame, BYTES_PER_PIXEL};
pub use state::{EngineState, EngineStatus};
pub use types::{CaptureMethod, FailureKind, Rect, WindowHandle, WindowInfo};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for commands (viewer → engine).
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity for events (engine → viewer).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Creates a bounded command channel.
pub fn command_channel() -> (Sender<EngineCommand>, Receiver<EngineCommand>) {
    crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY)
}

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<EngineEvent>, Receiver<EngineEvent>) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY)
}
