//! Stdin command console and event log.

use std::io::BufRead;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, trace, warn};

use windowscope_ipc::{EngineCommand, EngineEvent};

const HELP: &str = "commands: start, stop, pause, resume, fps <n>, status, quit";

/// Forward console lines to the engine until `quit` or end of input.
///
/// End of input is treated as `quit`.
pub fn read_commands<R: BufRead>(input: R, command_tx: Sender<EngineCommand>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(command) = EngineCommand::parse(line) else {
            warn!(input = line, "Unrecognized command; {}", HELP);
            continue;
        };

        let shutdown = command == EngineCommand::Shutdown;
        if command_tx.send(command).is_err() {
            debug!("Engine gone, console closing");
            return;
        }
        if shutdown {
            return;
        }
    }

    let _ = command_tx.send(EngineCommand::Shutdown);
}

/// Log engine events until the engine shuts down.
pub fn log_events(event_rx: Receiver<EngineEvent>) {
    for event in event_rx.iter() {
        if !log_event(&event) {
            break;
        }
    }
}

/// Log one event. Returns false once the engine has shut down.
pub fn log_event(event: &EngineEvent) -> bool {
    match event {
        EngineEvent::FrameCaptured { frame, sequence: 1 } => {
            info!(width = frame.width, height = frame.height, "First frame received");
        }
        EngineEvent::FrameCaptured { frame, sequence } => {
            trace!(sequence, width = frame.width, height = frame.height, "Frame");
        }
        EngineEvent::FpsUpdated(fps) => debug!(fps, "FPS"),
        EngineEvent::MethodChanged(method) => info!(%method, "Capture method"),
        EngineEvent::CaptureFailed { kind, message } => warn!(?kind, "{}", message),
        EngineEvent::StateChanged { previous, current } => {
            info!(previous = previous.name(), current = current.name(), "Engine state");
        }
        EngineEvent::Status(status) => match serde_json::to_string(status) {
            Ok(json) => info!(status = %json, "Engine status"),
            Err(e) => warn!("Failed to serialize status: {}", e),
        },
        EngineEvent::Shutdown => {
            info!("Engine shut down");
            return false;
        }
    }
    true
}
