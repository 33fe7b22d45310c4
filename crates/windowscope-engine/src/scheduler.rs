//! Fixed-interval tick scheduler.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use tracing::{debug, trace, Span};

use crate::error::EngineError;
use crate::EngineResult;

const THREAD_NAME: &str = "windowscope-tick";

/// Tick interval for `fps`, in whole milliseconds.
pub fn tick_interval(fps: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(fps.max(1)))
}

/// A running schedule. Ticks stop as soon as the schedule is cancelled or
/// dropped; a tick already executing runs to completion.
pub struct Scheduler {
    cancel_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl Scheduler {
    /// Start calling `on_tick` every `interval`, first after one interval.
    pub fn spawn<F>(interval: Duration, span: Span, mut on_tick: F) -> EngineResult<Self>
    where
        F: FnMut(Instant) + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let _guard = span.enter();
                debug!(interval_ms = interval.as_millis() as u64, "Scheduler started");

                let mut deadline = Instant::now() + interval;
                loop {
                    match cancel_rx.recv_deadline(deadline) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    on_tick(Instant::now());

                    deadline += interval;
                    let now = Instant::now();
                    if deadline <= now {
                        let mut skipped = 0u32;
                        while deadline <= now {
                            deadline += interval;
                            skipped += 1;
                        }
                        trace!(skipped, "Tick overran, skipping missed deadlines");
                    }
                }

                debug!("Scheduler stopped");
            })
            .map_err(|source| EngineError::ThreadSpawn {
                name: THREAD_NAME,
                source,
            })?;

        Ok(Self {
            cancel_tx: Some(cancel_tx),
            handle: Some(handle),
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cancel the schedule and return the thread handle for joining.
    pub fn cancel(mut self) -> Option<JoinHandle<()>> {
        self.cancel_tx.take();
        self.handle.take()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Closing the channel wakes the thread; it is detached if not joined.
        self.cancel_tx.take();
    }
}
