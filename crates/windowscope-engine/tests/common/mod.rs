//! Shared fakes for engine integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use windowscope_capture::{
    CaptureError, CaptureResult, CaptureStrategy, StrategyChain, WindowGeometryProvider,
};
use windowscope_engine::CaptureEngine;
use windowscope_ipc::{
    CaptureMethod, CaptureSettings, EngineEvent, EngineState, Frame, MonitorConfig, Rect,
    WindowHandle,
    WindowInfo,
};

pub const WINDOW: WindowHandle = WindowHandle(0x1234);

/// Upper bound for waiting on any engine event.
pub const WAIT: Duration = Duration::from_secs(5);

/// A window whose geometry and minimized state the test controls.
pub struct FakeWindow {
    rect: Mutex<Rect>,
    minimized: AtomicBool,
}

impl FakeWindow {
    pub fn new(width: i32, height: i32) -> Arc<Self> {
        Arc::new(Self {
            rect: Mutex::new(Rect::new(0, 0, width, height)),
            minimized: AtomicBool::new(false),
        })
    }

    pub fn set_minimized(&self, minimized: bool) {
        self.minimized.store(minimized, Ordering::SeqCst);
    }
}

impl WindowGeometryProvider for FakeWindow {
    fn window_rect(&self, _: WindowHandle) -> Rect {
        *self.rect.lock()
    }

    fn is_minimized(&self, _: WindowHandle) -> bool {
        self.minimized.load(Ordering::SeqCst)
    }

    fn enumerate_windows(&self) -> CaptureResult<Vec<WindowInfo>> {
        let rect = *self.rect.lock();
        Ok(vec![WindowInfo {
            handle: WINDOW,
            title: "fake".to_string(),
            width: rect.width as u32,
            height: rect.height as u32,
        }])
    }
}

/// A strategy that succeeds while its flag is set.
pub struct Toggle {
    method: CaptureMethod,
    works: Arc<AtomicBool>,
}

impl CaptureStrategy for Toggle {
    fn method(&self) -> CaptureMethod {
        self.method
    }

    fn capture(&self, _: WindowHandle, width: u32, height: u32) -> CaptureResult<Frame> {
        if !self.works.load(Ordering::SeqCst) {
            return Err(CaptureError::StrategyFailed {
                method: self.method,
                reason: "toggled off".to_string(),
            });
        }
        let data = Bytes::from(vec![0x7F; Frame::buffer_size(width, height)]);
        Ok(Frame::new(data, width, height))
    }
}

pub fn toggle(method: CaptureMethod, works: bool) -> (Box<dyn CaptureStrategy>, Arc<AtomicBool>) {
    let flag = Arc::new(AtomicBool::new(works));
    let strategy = Toggle {
        method,
        works: Arc::clone(&flag),
    };
    (Box::new(strategy), flag)
}

/// Call accounting for [`Slow`].
#[derive(Debug, Default)]
pub struct CallGauge {
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl CallGauge {
    /// Captures executing right now.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Most captures ever executing at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Captures started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Block until a capture is executing.
    pub fn wait_active(&self) -> bool {
        let deadline = Instant::now() + WAIT;
        while Instant::now() < deadline {
            if self.active() > 0 {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }
}

/// A strategy that takes `delay` per capture. Every byte of a frame holds
/// the low byte of the call number that produced it, starting at 1.
pub struct Slow {
    delay: Duration,
    gauge: Arc<CallGauge>,
}

impl CaptureStrategy for Slow {
    fn method(&self) -> CaptureMethod {
        CaptureMethod::DirectCopy
    }

    fn capture(&self, _: WindowHandle, width: u32, height: u32) -> CaptureResult<Frame> {
        let call = self.gauge.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let active = self.gauge.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.gauge.peak.fetch_max(active, Ordering::SeqCst);

        thread::sleep(self.delay);

        self.gauge.active.fetch_sub(1, Ordering::SeqCst);
        let data = Bytes::from(vec![call as u8; Frame::buffer_size(width, height)]);
        Ok(Frame::new(data, width, height))
    }
}

pub fn slow(delay: Duration) -> (Box<dyn CaptureStrategy>, Arc<CallGauge>) {
    let gauge = Arc::new(CallGauge::default());
    let strategy = Slow {
        delay,
        gauge: Arc::clone(&gauge),
    };
    (Box::new(strategy), gauge)
}

/// Call number that produced a frame from [`Slow`].
pub fn frame_call(event: &EngineEvent) -> Option<u8> {
    match event {
        EngineEvent::FrameCaptured { frame, .. } => frame.data.first().copied(),
        _ => None,
    }
}

/// An engine over a 64x48 fake window with the given strategies and event
/// channel capacity.
pub fn engine_with(
    config: MonitorConfig,
    strategies: Vec<Box<dyn CaptureStrategy>>,
    capacity: usize,
) -> (CaptureEngine, Receiver<EngineEvent>) {
    let (event_tx, events) = crossbeam_channel::bounded(capacity);
    let engine = CaptureEngine::new(
        config,
        CaptureSettings::default(),
        FakeWindow::new(64, 48),
        StrategyChain::new(strategies),
        event_tx,
    )
    .unwrap();
    (engine, events)
}

pub struct Harness {
    pub engine: CaptureEngine,
    pub events: Receiver<EngineEvent>,
    pub window: Arc<FakeWindow>,
    pub primary: Arc<AtomicBool>,
}

/// An engine over a 64x48 fake window with one working strategy.
pub fn harness(config: MonitorConfig) -> Harness {
    let window = FakeWindow::new(64, 48);
    let (strategy, primary) = toggle(CaptureMethod::DirectCopy, true);
    let (event_tx, events) = crossbeam_channel::bounded(4096);
    let engine = CaptureEngine::new(
        config,
        CaptureSettings::default(),
        window.clone(),
        StrategyChain::new(vec![strategy]),
        event_tx,
    )
    .unwrap();

    Harness {
        engine,
        events,
        window,
        primary,
    }
}

/// Receive events until one matches, discarding the rest.
pub fn wait_for(
    events: &Receiver<EngineEvent>,
    mut matches: impl FnMut(&EngineEvent) -> bool,
) -> Option<EngineEvent> {
    let deadline = Instant::now() + WAIT;
    while let Ok(event) = events.recv_deadline(deadline) {
        if matches(&event) {
            return Some(event);
        }
    }
    None
}

pub fn is_paused(event: &EngineEvent) -> bool {
    matches!(
        event,
        EngineEvent::StateChanged {
            current: EngineState::Paused,
            ..
        }
    )
}

pub fn is_stopped(event: &EngineEvent) -> bool {
    matches!(
        event,
        EngineEvent::StateChanged {
            current: EngineState::Stopped,
            ..
        }
    )
}

pub fn is_frame(event: &EngineEvent) -> bool {
    matches!(event, EngineEvent::FrameCaptured { .. })
}

/// Sequence number of the next delivered frame.
pub fn next_sequence(events: &Receiver<EngineEvent>) -> Option<u64> {
    match wait_for(events, is_frame)? {
        EngineEvent::FrameCaptured { sequence, .. } => Some(sequence),
        _ => None,
    }
}

/// Drain everything currently queued.
pub fn drain(events: &Receiver<EngineEvent>) -> Vec<EngineEvent> {
    events.try_iter().collect()
}
