//! Capture engine lifecycle and scheduling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, error, info, info_span, trace, warn, Span};

use windowscope_capture::{StrategyChain, WindowGeometryProvider};
use windowscope_ipc::{
    CaptureSettings, EngineCommand, EngineEvent, EngineState, EngineStatus, MonitorConfig,
    WindowHandle,
};

use crate::acquisition::Acquisition;
use crate::error::EngineError;
use crate::metrics::SessionStats;
use crate::scheduler::{tick_interval, Scheduler};
use crate::session::CaptureSession;
use crate::EngineResult;

/// How long a state or method announcement waits for room in the event
/// channel. Frames and rate updates never wait.
const CONTROL_SEND_TIMEOUT: Duration = Duration::from_millis(500);

struct Lifecycle {
    state: EngineState,
    fps: u32,
    /// Incremented on every start and pause; ticks scheduled before either
    /// never publish.
    epoch: u64,
}

impl Lifecycle {
    fn is_current(&self, epoch: u64) -> bool {
        self.state.is_running() && self.epoch == epoch
    }
}

struct Shared {
    window: WindowHandle,
    settings: CaptureSettings,
    lifecycle: Mutex<Lifecycle>,
    session: Mutex<CaptureSession>,
    stats: Arc<SessionStats>,
    event_tx: Sender<EngineEvent>,
    span: Span,
}

impl Shared {
    fn run_tick(&self, epoch: u64, now: Instant) {
        if !self.lifecycle.lock().is_current(epoch) {
            return;
        }

        let Some(mut session) = self.session.try_lock() else {
            trace!("Previous tick still in flight, dropping tick");
            return;
        };
        let report = session.tick(now);

        // Publish while still holding the session so ticks never interleave.
        let lifecycle = self.lifecycle.lock();
        if lifecycle.is_current(epoch) {
            for event in report.events {
                let announcement = matches!(event, EngineEvent::MethodChanged(_));
                if !self.send_event(event) && announcement {
                    session.method_announcement_lost();
                }
            }
        } else {
            debug!(
                outcome = ?report.outcome,
                discarded = report.events.len(),
                "Engine left running state during tick, discarding results"
            );
        }
    }

    /// Change state and announce it. Called with the lifecycle lock held so the
    /// announcement is ordered before any tick of the new state publishes.
    fn transition_to(&self, lifecycle: &mut Lifecycle, new_state: EngineState) {
        let previous = std::mem::replace(&mut lifecycle.state, new_state);
        if previous == new_state {
            return;
        }

        debug!(
            previous = previous.name(),
            current = new_state.name(),
            "State transition"
        );
        if !self.send_event(EngineEvent::StateChanged {
            previous,
            current: new_state,
        }) {
            debug!(current = new_state.name(), "State change not announced");
        }
    }

    /// Publish one event. Returns false if the viewer never received it.
    fn send_event(&self, event: EngineEvent) -> bool {
        if event.is_droppable() {
            return match self.event_tx.try_send(event) {
                Ok(()) => true,
                Err(TrySendError::Full(event)) => {
                    warn!(event = event.name(), "Event channel full, dropping event");
                    false
                }
                Err(TrySendError::Disconnected(event)) => {
                    trace!(event = event.name(), "Event channel closed, dropping event");
                    false
                }
            };
        }

        match self.event_tx.send_timeout(event, CONTROL_SEND_TIMEOUT) {
            Ok(()) => true,
            Err(SendTimeoutError::Timeout(event)) => {
                warn!(
                    event = event.name(),
                    timeout_ms = CONTROL_SEND_TIMEOUT.as_millis() as u64,
                    "Event channel stalled, dropping event"
                );
                false
            }
            Err(SendTimeoutError::Disconnected(event)) => {
                trace!(event = event.name(), "Event channel closed, dropping event");
                false
            }
        }
    }
}

/// Drives one window's capture session on a fixed schedule.
///
/// All control methods take `&self` and may be called from any thread.
/// Engines are independent of each other; each owns its worker threads.
pub struct CaptureEngine {
    shared: Arc<Shared>,
    scheduler: Mutex<Option<Scheduler>>,
}

impl CaptureEngine {
    /// Create a stopped engine for `config`.
    ///
    /// Fails if the settings, region or frame rate are invalid, or if the
    /// acquisition worker cannot be started.
    pub fn new(
        config: MonitorConfig,
        settings: CaptureSettings,
        provider: Arc<dyn WindowGeometryProvider>,
        chain: StrategyChain,
        event_tx: Sender<EngineEvent>,
    ) -> EngineResult<Self> {
        let fps = config.resolve(&settings)?;
        let span = info_span!("capture_engine", window = %config.window);

        let methods = chain.methods();
        let acquisition = Acquisition::spawn(chain, settings.acquisition_timeout(), span.clone())?;
        let stats = Arc::new(SessionStats::default());
        let session = CaptureSession::new(
            config.window,
            config.region,
            provider,
            acquisition,
            &settings,
            Arc::clone(&stats),
        );

        span.in_scope(|| {
            info!(
                fps,
                region = ?config.region,
                ?methods,
                "Capture engine created"
            );
        });

        Ok(Self {
            shared: Arc::new(Shared {
                window: config.window,
                settings,
                lifecycle: Mutex::new(Lifecycle {
                    state: EngineState::Stopped,
                    fps,
                    epoch: 0,
                }),
                session: Mutex::new(session),
                stats,
                event_tx,
                span,
            }),
            scheduler: Mutex::new(None),
        })
    }

    /// `Stopped -> Running`. No-op in any other state.
    pub fn start(&self) -> EngineResult<()> {
        let _enter = self.shared.span.enter();
        let mut slot = self.scheduler.lock();

        let (fps, epoch) = {
            let mut lifecycle = self.shared.lifecycle.lock();
            if !lifecycle.state.is_stopped() {
                debug!(state = lifecycle.state.name(), "Already started, ignoring start");
                return Ok(());
            }
            lifecycle.epoch += 1;
            self.shared.transition_to(&mut lifecycle, EngineState::Running);
            (lifecycle.fps, lifecycle.epoch)
        };

        match self.schedule(fps, epoch) {
            Ok(scheduler) => {
                info!(
                    fps,
                    interval_ms = scheduler.interval().as_millis() as u64,
                    "Capture engine started"
                );
                *slot = Some(scheduler);
                Ok(())
            }
            Err(e) => {
                error!("Capture engine start failed: {}", e);
                let mut lifecycle = self.shared.lifecycle.lock();
                self.shared.transition_to(&mut lifecycle, EngineState::Stopped);
                Err(e)
            }
        }
    }

    /// Any state `-> Stopped`. Idempotent.
    pub fn stop(&self) {
        let _enter = self.shared.span.enter();
        let handle = {
            let mut slot = self.scheduler.lock();
            {
                let mut lifecycle = self.shared.lifecycle.lock();
                if lifecycle.state.is_stopped() {
                    debug!("Already stopped, ignoring stop");
                    return;
                }
                self.shared.transition_to(&mut lifecycle, EngineState::Stopped);
            }
            slot.take().and_then(Scheduler::cancel)
        };

        if let Some(handle) = handle {
            let _ = handle.join();
        }
        info!(
            captures = self.shared.stats.capture_count(),
            delivered = self.shared.stats.frames_delivered(),
            "Capture engine stopped"
        );
    }

    /// `Running -> Paused`. Counters and frame-rate history are kept.
    pub fn pause(&self) {
        let _enter = self.shared.span.enter();
        let handle = {
            let mut slot = self.scheduler.lock();
            {
                let mut lifecycle = self.shared.lifecycle.lock();
                if !lifecycle.state.is_running() {
                    debug!(state = lifecycle.state.name(), "Not running, ignoring pause");
                    return;
                }
                lifecycle.epoch += 1;
                self.shared.transition_to(&mut lifecycle, EngineState::Paused);
            }
            slot.take().and_then(Scheduler::cancel)
        };

        if let Some(handle) = handle {
            let _ = handle.join();
        }
        info!("Capture paused");
    }

    /// `Paused -> Running` at the current frame rate.
    pub fn resume(&self) -> EngineResult<()> {
        let _enter = self.shared.span.enter();
        let mut slot = self.scheduler.lock();

        let (fps, epoch) = {
            let mut lifecycle = self.shared.lifecycle.lock();
            if !lifecycle.state.is_paused() {
                debug!(state = lifecycle.state.name(), "Not paused, ignoring resume");
                return Ok(());
            }
            self.shared.transition_to(&mut lifecycle, EngineState::Running);
            (lifecycle.fps, lifecycle.epoch)
        };

        match self.schedule(fps, epoch) {
            Ok(scheduler) => {
                info!(fps, "Capture resumed");
                *slot = Some(scheduler);
                Ok(())
            }
            Err(e) => {
                error!("Capture resume failed: {}", e);
                let mut lifecycle = self.shared.lifecycle.lock();
                self.shared.transition_to(&mut lifecycle, EngineState::Paused);
                Err(e)
            }
        }
    }

    /// Change the frame rate. Values outside the configured bounds are
    /// ignored.
    pub fn set_fps(&self, fps: u32) {
        if let Err(e) = self.try_set_fps(fps) {
            self.shared.span.in_scope(|| debug!("Frame rate not applied: {}", e));
        }
    }

    /// Change the frame rate, reporting out-of-range values.
    ///
    /// While running, the schedule is replaced at the new interval; while
    /// stopped or paused the value applies on the next start or resume.
    pub fn try_set_fps(&self, fps: u32) -> EngineResult<()> {
        let _enter = self.shared.span.enter();
        let settings = &self.shared.settings;
        if !settings.accepts_fps(fps) {
            return Err(EngineError::ConfigRejected {
                fps,
                min: settings.min_fps,
                max: settings.max_fps,
            });
        }

        let replaced = {
            let mut slot = self.scheduler.lock();
            let (previous, running, epoch) = {
                let mut lifecycle = self.shared.lifecycle.lock();
                let previous = std::mem::replace(&mut lifecycle.fps, fps);
                (previous, lifecycle.state.is_running(), lifecycle.epoch)
            };

            if previous == fps {
                return Ok(());
            }
            if !running {
                info!(previous, fps, "Frame rate updated");
                return Ok(());
            }

            match self.schedule(fps, epoch) {
                Ok(scheduler) => {
                    info!(previous, fps, "Frame rate updated, schedule replaced");
                    slot.replace(scheduler).and_then(Scheduler::cancel)
                }
                Err(e) => {
                    self.shared.lifecycle.lock().fps = previous;
                    return Err(e);
                }
            }
        };

        // Wait out the old schedule's in-flight tick so no tick outlives a
        // later pause or stop.
        if let Some(handle) = replaced {
            let _ = handle.join();
        }
        Ok(())
    }

    fn schedule(&self, fps: u32, epoch: u64) -> EngineResult<Scheduler> {
        let shared = Arc::clone(&self.shared);
        Scheduler::spawn(tick_interval(fps), self.shared.span.clone(), move |now| {
            shared.run_tick(epoch, now);
        })
    }

    /// Handle a command. Returns false if the command loop should exit.
    pub fn handle_command(&self, command: EngineCommand) -> bool {
        self.shared
            .span
            .in_scope(|| debug!(?command, "Handling command"));

        match command {
            EngineCommand::Start => {
                if let Err(e) = self.start() {
                    error!("Start failed: {}", e);
                }
            }
            EngineCommand::Stop => self.stop(),
            EngineCommand::Pause => self.pause(),
            EngineCommand::Resume => {
                if let Err(e) = self.resume() {
                    error!("Resume failed: {}", e);
                }
            }
            EngineCommand::SetFps(fps) => self.set_fps(fps),
            EngineCommand::GetStatus => {
                self.shared.send_event(EngineEvent::Status(self.status()));
            }
            EngineCommand::Shutdown => {
                self.stop();
                self.shared.send_event(EngineEvent::Shutdown);
                return false;
            }
        }

        true
    }

    /// Process commands until `Shutdown` or until every sender is dropped.
    pub fn run(&self, command_rx: Receiver<EngineCommand>) {
        self.shared.span.in_scope(|| info!("Command loop starting"));

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    if !self.handle_command(command) {
                        break;
                    }
                }
                Err(_) => {
                    self.shared
                        .span
                        .in_scope(|| info!("Command channel disconnected, shutting down"));
                    self.stop();
                    break;
                }
            }
        }

        self.shared.span.in_scope(|| info!("Command loop exited"));
    }

    pub fn state(&self) -> EngineState {
        self.shared.lifecycle.lock().state
    }

    /// Target frame rate.
    pub fn fps(&self) -> u32 {
        self.shared.lifecycle.lock().fps
    }

    pub fn window(&self) -> WindowHandle {
        self.shared.window
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.shared.settings
    }

    /// Current status snapshot. Never waits on an in-flight tick.
    pub fn status(&self) -> EngineStatus {
        let (state, fps) = {
            let lifecycle = self.shared.lifecycle.lock();
            (lifecycle.state, lifecycle.fps)
        };
        self.shared.stats.snapshot(state, fps)
    }
}

impl Drop for CaptureEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
