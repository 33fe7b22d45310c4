//! Per-tick capture pipeline.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use windowscope_capture::{clamp_region, crop_frame, CaptureError, WindowGeometryProvider};
use windowscope_ipc::{
    CaptureMethod, CaptureSettings, EngineEvent, FailureKind, Frame, Rect, WindowHandle,
};

use crate::acquisition::Acquisition;
use crate::failure::FailureClassifier;
use crate::metrics::{FpsMeter, SessionStats};

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was cropped and queued for delivery.
    Delivered,
    /// The window rectangle was empty or the window is gone.
    GeometryInvalid,
    /// No frame could be produced.
    Failed,
}

/// Result of one tick: the outcome and the events to publish, in order.
#[derive(Debug)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub events: Vec<EngineEvent>,
}

impl TickReport {
    fn new(outcome: TickOutcome, events: Vec<EngineEvent>) -> Self {
        Self { outcome, events }
    }
}

/// Mutable state of one monitoring session, advanced one tick at a time.
pub struct CaptureSession {
    window: WindowHandle,
    region: Option<Rect>,
    provider: Arc<dyn WindowGeometryProvider>,
    acquisition: Acquisition,
    classifier: FailureClassifier,
    fps_meter: FpsMeter,
    current_method: Option<CaptureMethod>,
    /// Method the viewer was last told about; trails `current_method` until
    /// a `MethodChanged` is actually published.
    announced_method: Option<CaptureMethod>,
    capture_count: u64,
    frames_delivered: u64,
    verbose_interval: u64,
    last_diagnosis: Option<FailureKind>,
    stats: Arc<SessionStats>,
}

impl CaptureSession {
    /// Create a session for `window`. A `None` region delivers the full window.
    pub fn new(
        window: WindowHandle,
        region: Option<Rect>,
        provider: Arc<dyn WindowGeometryProvider>,
        acquisition: Acquisition,
        settings: &CaptureSettings,
        stats: Arc<SessionStats>,
    ) -> Self {
        Self {
            window,
            region,
            provider,
            acquisition,
            classifier: FailureClassifier::new(settings.failure_escalation_threshold),
            fps_meter: FpsMeter::new(),
            current_method: None,
            announced_method: None,
            capture_count: 0,
            frames_delivered: 0,
            verbose_interval: settings.verbose_log_interval.max(1),
            last_diagnosis: None,
            stats,
        }
    }

    /// Run one capture attempt at `now`.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        self.capture_count += 1;
        self.stats.set_capture_count(self.capture_count);
        let verbose = (self.capture_count - 1) % self.verbose_interval == 0;

        let bounds = self.provider.window_rect(self.window);
        if bounds.is_degenerate() {
            let failures = self.record_failure();
            if verbose {
                debug!(
                    tick = self.capture_count,
                    width = bounds.width,
                    height = bounds.height,
                    failures,
                    "Window geometry invalid"
                );
            }
            return TickReport::new(TickOutcome::GeometryInvalid, Vec::new());
        }

        match self.capture(bounds) {
            Ok((method, frame)) => self.deliver(method, frame, now, verbose),
            Err(e) => self.fail(e, verbose),
        }
    }

    fn capture(&self, bounds: Rect) -> Result<(CaptureMethod, Frame), CaptureError> {
        let capture = self.acquisition.capture(
            self.window,
            bounds.width as u32,
            bounds.height as u32,
        )?;

        let full = Rect::new(0, 0, capture.frame.width as i32, capture.frame.height as i32);
        let region = match self.region {
            Some(region) => clamp_region(region, full.width, full.height),
            None => full,
        };
        let frame = crop_frame(&capture.frame, region)?;
        Ok((capture.method, frame))
    }

    fn deliver(
        &mut self,
        method: CaptureMethod,
        frame: Frame,
        now: Instant,
        verbose: bool,
    ) -> TickReport {
        let mut events = Vec::with_capacity(3);

        let recovered_from = self.classifier.record_success();
        self.stats.set_consecutive_failures(0);
        if self.last_diagnosis.take().is_some() {
            info!(failures = recovered_from, "Capture recovered");
        }

        if self.current_method != Some(method) {
            info!(
                previous = ?self.current_method.map(CaptureMethod::as_str),
                current = %method,
                "Capture method changed"
            );
            self.current_method = Some(method);
            self.stats.set_current_method(method);
        }
        if self.announced_method != Some(method) {
            self.announced_method = Some(method);
            events.push(EngineEvent::MethodChanged(method));
        }

        self.frames_delivered += 1;
        self.stats.set_frames_delivered(self.frames_delivered);
        if verbose {
            debug!(
                tick = self.capture_count,
                sequence = self.frames_delivered,
                %method,
                width = frame.width,
                height = frame.height,
                "Frame captured"
            );
        }
        events.push(EngineEvent::FrameCaptured {
            frame,
            sequence: self.frames_delivered,
        });

        if let Some(fps) = self.fps_meter.record(now) {
            self.stats.set_actual_fps(fps);
            events.push(EngineEvent::FpsUpdated(fps));
        }

        TickReport::new(TickOutcome::Delivered, events)
    }

    fn fail(&mut self, error: CaptureError, verbose: bool) -> TickReport {
        let failures = self.record_failure();

        let provider = &self.provider;
        let window = self.window;
        let Some(kind) = self.classifier.classify(|| provider.is_minimized(window)) else {
            if verbose {
                debug!(tick = self.capture_count, failures, error = %error, "Capture failed");
            } else {
                trace!(failures, error = %error, "Capture failed");
            }
            return TickReport::new(TickOutcome::Failed, Vec::new());
        };

        if self.last_diagnosis != Some(kind) {
            warn!(failures, error = %error, ?kind, "{}", kind.message());
            self.last_diagnosis = Some(kind);
        }
        TickReport::new(TickOutcome::Failed, vec![EngineEvent::capture_failed(kind)])
    }

    /// The last `MethodChanged` never reached the viewer; announce the method
    /// again with the next frame.
    pub fn method_announcement_lost(&mut self) {
        self.announced_method = None;
    }

    fn record_failure(&mut self) -> u32 {
        let failures = self.classifier.record_failure();
        self.stats.set_consecutive_failures(failures);
        failures
    }

    pub fn window(&self) -> WindowHandle {
        self.window
    }

    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    /// Tick attempts so far, including failures.
    pub fn capture_count(&self) -> u64 {
        self.capture_count
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.classifier.consecutive()
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }

    /// Method that produced the most recent frame.
    pub fn current_method(&self) -> Option<CaptureMethod> {
        self.current_method
    }
}
