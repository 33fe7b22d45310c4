//! Prioritized capture strategies with automatic fallback.

use tracing::{debug, trace};
use windowscope_ipc::{CaptureMethod, Frame, WindowHandle};

use crate::error::CaptureError;
use crate::CaptureResult;

/// One way of producing a full-window image.
///
/// Each attempt owns every native resource it acquires and releases it
/// before returning, whatever the outcome. Nothing is held across calls.
pub trait CaptureStrategy: Send + Sync {
    /// Tag reported when this strategy produces a frame.
    fn method(&self) -> CaptureMethod;

    /// Capture `window` into a `width` x `height` BGRA frame.
    fn capture(&self, window: WindowHandle, width: u32, height: u32) -> CaptureResult<Frame>;
}

/// A frame and the strategy that produced it.
#[derive(Debug, Clone)]
pub struct ChainCapture {
    pub frame: Frame,
    pub method: CaptureMethod,
}

/// Ordered list of strategies, tried in priority order until one succeeds.
pub struct StrategyChain {
    strategies: Vec<Box<dyn CaptureStrategy>>,
}

impl StrategyChain {
    /// Create a chain from strategies in priority order.
    pub fn new(strategies: Vec<Box<dyn CaptureStrategy>>) -> Self {
        Self { strategies }
    }

    /// Append a lower-priority strategy.
    pub fn push(&mut self, strategy: Box<dyn CaptureStrategy>) {
        self.strategies.push(strategy);
    }

    /// Methods in priority order.
    pub fn methods(&self) -> Vec<CaptureMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Try each strategy once, returning the first frame produced.
    pub fn capture(
        &self,
        window: WindowHandle,
        width: u32,
        height: u32,
    ) -> CaptureResult<ChainCapture> {
        for strategy in &self.strategies {
            let method = strategy.method();
            match strategy.capture(window, width, height) {
                Ok(frame) if frame.is_valid() => {
                    trace!(%method, width, height, "Strategy produced frame");
                    return Ok(ChainCapture { frame, method });
                }
                Ok(frame) => {
                    debug!(%method, ?frame, "Strategy returned malformed frame");
                }
                Err(e) => {
                    debug!(%method, error = %e, "Strategy failed");
                }
            }
        }

        Err(CaptureError::AllStrategiesFailed)
    }
}
