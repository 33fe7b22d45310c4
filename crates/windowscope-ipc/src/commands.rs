//! Commands sent from the viewer to the engine.

use serde::{Deserialize, Serialize};

/// Commands that the viewer can send to a capture engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCommand {
    /// Begin periodic capture.
    Start,

    /// Stop capturing and cancel the schedule.
    Stop,

    /// Suspend the schedule, keeping counters and history.
    Pause,

    /// Resume a paused schedule at the current frame rate.
    Resume,

    /// Change the target frame rate. Out-of-range values are ignored.
    SetFps(u32),

    /// Request a status snapshot.
    GetStatus,

    /// Stop and leave the command loop.
    Shutdown,
}

impl EngineCommand {
    /// Parse a console line such as `pause` or `fps 15`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let command = match parts.next()?.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "stop" => Self::Stop,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "status" => Self::GetStatus,
            "quit" | "exit" | "shutdown" => Self::Shutdown,
            "fps" => Self::SetFps(parts.next()?.parse().ok()?),
            _ => return None,
        };

        if parts.next().is_some() {
            return None;
        }

        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(EngineCommand::parse("pause"), Some(EngineCommand::Pause));
        assert_eq!(EngineCommand::parse("  Resume "), Some(EngineCommand::Resume));
        assert_eq!(EngineCommand::parse("quit"), Some(EngineCommand::Shutdown));
        assert_eq!(EngineCommand::parse("status"), Some(EngineCommand::GetStatus));
    }

    #[test]
    fn test_parse_fps() {
        assert_eq!(EngineCommand::parse("fps 15"), Some(EngineCommand::SetFps(15)));
        assert_eq!(EngineCommand::parse("fps"), None);
        assert_eq!(EngineCommand::parse("fps fast"), None);
        assert_eq!(EngineCommand::parse("fps 15 20"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(EngineCommand::parse(""), None);
        assert_eq!(EngineCommand::parse("record"), None);
    }
}
