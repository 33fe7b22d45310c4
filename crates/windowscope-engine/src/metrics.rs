//! Frame-rate measurement and live session counters.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use windowscope_ipc::{CaptureMethod, EngineState, EngineStatus};

/// Width of the sliding window used for frame-rate measurement.
pub const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Sliding-window frame counter.
///
/// Reports the number of deliveries in the trailing second. This reacts
/// immediately to schedule changes, unlike a moving average.
#[derive(Debug)]
pub struct FpsMeter {
    window: Duration,
    samples: VecDeque<Instant>,
}

impl FpsMeter {
    /// Create a meter over the default one-second window.
    pub fn new() -> Self {
        Self::with_window(FPS_WINDOW)
    }

    /// Create a meter over a custom window.
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            samples: VecDeque::new(),
        }
    }

    /// Record a delivery at `now` and return the current rate, if measurable.
    pub fn record(&mut self, now: Instant) -> Option<f32> {
        self.samples.push_back(now);
        self.prune(now);
        self.current()
    }

    /// Drop samples older than the window relative to `now`.
    pub fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.samples.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Deliveries in the window, once at least two are present.
    pub fn current(&self) -> Option<f32> {
        if self.samples.len() >= 2 {
            Some(self.samples.len() as f32)
        } else {
            None
        }
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters mirrored out of the tick pipeline so that status reads never
/// wait on an in-flight tick.
#[derive(Debug, Default)]
pub struct SessionStats {
    capture_count: AtomicU64,
    consecutive_failures: AtomicU32,
    frames_delivered: AtomicU64,
    actual_fps: RwLock<f32>,
    current_method: RwLock<Option<CaptureMethod>>,
}

impl SessionStats {
    pub fn set_capture_count(&self, count: u64) {
        self.capture_count.store(count, Ordering::Relaxed);
    }

    pub fn set_consecutive_failures(&self, count: u32) {
        self.consecutive_failures.store(count, Ordering::Relaxed);
    }

    pub fn set_frames_delivered(&self, count: u64) {
        self.frames_delivered.store(count, Ordering::Relaxed);
    }

    pub fn set_actual_fps(&self, fps: f32) {
        *self.actual_fps.write() = fps;
    }

    pub fn set_current_method(&self, method: CaptureMethod) {
        *self.current_method.write() = Some(method);
    }

    pub fn capture_count(&self) -> u64 {
        self.capture_count.load(Ordering::Relaxed)
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Relaxed)
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered.load(Ordering::Relaxed)
    }

    pub fn actual_fps(&self) -> f32 {
        *self.actual_fps.read()
    }

    pub fn current_method(&self) -> Option<CaptureMethod> {
        *self.current_method.read()
    }

    /// Get current status snapshot.
    pub fn snapshot(&self, state: EngineState, target_fps: u32) -> EngineStatus {
        EngineStatus {
            state,
            target_fps,
            actual_fps: self.actual_fps(),
            capture_count: self.capture_count(),
            consecutive_failures: self.consecutive_failures(),
            frames_delivered: self.frames_delivered(),
            current_method: self.current_method(),
        }
    }
}
