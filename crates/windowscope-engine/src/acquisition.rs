//! Bounded-time native acquisition.
//!
//! Strategy calls run on a dedicated worker so that a hung OS call costs the
//! engine one failed tick instead of the whole schedule.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use tracing::{debug, trace, Span};

use windowscope_capture::{CaptureError, CaptureResult, ChainCapture, StrategyChain};
use windowscope_ipc::WindowHandle;

use crate::error::EngineError;
use crate::EngineResult;

const THREAD_NAME: &str = "windowscope-acquire";

struct Request {
    window: WindowHandle,
    width: u32,
    height: u32,
    reply: Sender<CaptureResult<ChainCapture>>,
}

/// Handle to the acquisition worker.
///
/// Dropping the handle closes the request channel; the worker exits once any
/// in-flight strategy call returns.
pub struct Acquisition {
    request_tx: Sender<Request>,
    busy: Arc<AtomicBool>,
    timeout: Duration,
}

impl Acquisition {
    /// Spawn a worker that runs `chain` for each request.
    pub fn spawn(chain: StrategyChain, timeout: Duration, span: Span) -> EngineResult<Self> {
        let (request_tx, request_rx) = bounded::<Request>(1);
        let busy = Arc::new(AtomicBool::new(false));
        let worker_busy = Arc::clone(&busy);

        thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let _guard = span.enter();
                debug!(methods = ?chain.methods(), "Acquisition worker started");

                for request in request_rx.iter() {
                    let result = chain.capture(request.window, request.width, request.height);
                    worker_busy.store(false, Ordering::Release);
                    if request.reply.try_send(result).is_err() {
                        trace!("Acquisition result arrived after timeout, dropped");
                    }
                }

                debug!("Acquisition worker stopped");
            })
            .map_err(|source| EngineError::ThreadSpawn {
                name: THREAD_NAME,
                source,
            })?;

        Ok(Self {
            request_tx,
            busy,
            timeout,
        })
    }

    /// Capture `window` at `width` x `height`, waiting at most the timeout.
    ///
    /// Fails with [`CaptureError::AcquisitionBusy`] while a previous call that
    /// timed out is still running on the worker.
    pub fn capture(
        &self,
        window: WindowHandle,
        width: u32,
        height: u32,
    ) -> CaptureResult<ChainCapture> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CaptureError::AcquisitionBusy);
        }

        let (reply_tx, reply_rx) = bounded(1);
        let request = Request {
            window,
            width,
            height,
            reply: reply_tx,
        };

        if self.request_tx.try_send(request).is_err() {
            self.busy.store(false, Ordering::Release);
            return Err(CaptureError::AcquisitionBusy);
        }

        match reply_rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(CaptureError::AcquisitionTimeout(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                // Worker is gone; nothing will clear the flag for us.
                self.busy.store(false, Ordering::Release);
                Err(CaptureError::AllStrategiesFailed)
            }
        }
    }

    /// Whether a strategy call is still running on the worker.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
