//! Integration tests: the command loop over crossbeam channels.

mod common;

use std::sync::Arc;
use std::thread;

use windowscope_engine::CaptureEngine;
use windowscope_ipc::{command_channel, EngineCommand, EngineEvent, EngineState, MonitorConfig};

use common::{harness, next_sequence, wait_for, WINDOW};

fn spawn_loop(
    engine: Arc<CaptureEngine>,
) -> (
    crossbeam_channel::Sender<EngineCommand>,
    thread::JoinHandle<()>,
) {
    let (command_tx, command_rx) = command_channel();
    let handle = thread::spawn(move || engine.run(command_rx));
    (command_tx, handle)
}

#[test]
fn test_commands_drive_lifecycle() {
    let h = harness(MonitorConfig::new(WINDOW).with_fps(60));
    let engine = Arc::new(h.engine);
    let (command_tx, handle) = spawn_loop(Arc::clone(&engine));

    command_tx.send(EngineCommand::Start).unwrap();
    assert!(next_sequence(&h.events).is_some());

    command_tx.send(EngineCommand::Pause).unwrap();
    let paused = wait_for(&h.events, |e| {
        matches!(
            e,
            EngineEvent::StateChanged {
                current: EngineState::Paused,
                ..
            }
        )
    });
    assert!(paused.is_some());

    command_tx.send(EngineCommand::SetFps(15)).unwrap();
    command_tx.send(EngineCommand::GetStatus).unwrap();
    match wait_for(&h.events, |e| matches!(e, EngineEvent::Status(_))) {
        Some(EngineEvent::Status(status)) => {
            assert_eq!(status.state, EngineState::Paused);
            assert_eq!(status.target_fps, 15);
            assert!(status.frames_delivered >= 1);
        }
        other => panic!("expected Status, got {other:?}"),
    }

    command_tx.send(EngineCommand::Shutdown).unwrap();
    assert!(wait_for(&h.events, |e| matches!(e, EngineEvent::Shutdown)).is_some());
    handle.join().unwrap();
    assert_eq!(engine.state(), EngineState::Stopped);
}

#[test]
fn test_out_of_range_fps_command_is_ignored() {
    let h = harness(MonitorConfig::new(WINDOW));
    let engine = Arc::new(h.engine);
    let (command_tx, handle) = spawn_loop(Arc::clone(&engine));

    command_tx.send(EngineCommand::SetFps(0)).unwrap();
    command_tx.send(EngineCommand::SetFps(90)).unwrap();
    command_tx.send(EngineCommand::GetStatus).unwrap();
    match wait_for(&h.events, |e| matches!(e, EngineEvent::Status(_))) {
        Some(EngineEvent::Status(status)) => assert_eq!(status.target_fps, 30),
        other => panic!("expected Status, got {other:?}"),
    }

    command_tx.send(EngineCommand::Shutdown).unwrap();
    handle.join().unwrap();
}

#[test]
fn test_disconnected_commands_stop_engine() {
    let h = harness(MonitorConfig::new(WINDOW).with_fps(60));
    let engine = Arc::new(h.engine);
    let (command_tx, handle) = spawn_loop(Arc::clone(&engine));

    command_tx.send(EngineCommand::Start).unwrap();
    assert!(next_sequence(&h.events).is_some());

    drop(command_tx);
    handle.join().unwrap();
    assert_eq!(engine.state(), EngineState::Stopped);
}
