//! Consecutive-failure tracking and escalation.

use windowscope_ipc::FailureKind;

/// Counts failed ticks since the last success and decides when a failure
/// becomes persistent enough to show the user.
///
/// Failures up to the threshold are silent. Every failing tick past it is
/// classified, so the viewer always reflects the current cause.
#[derive(Debug, Clone)]
pub struct FailureClassifier {
    threshold: u32,
    consecutive: u32,
}

impl FailureClassifier {
    /// Create a classifier that escalates after `threshold` failures.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            consecutive: 0,
        }
    }

    /// Count a failed tick and return the new total.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive = self.consecutive.saturating_add(1);
        self.consecutive
    }

    /// Reset after a successful tick, returning how many failures preceded it.
    pub fn record_success(&mut self) -> u32 {
        std::mem::take(&mut self.consecutive)
    }

    /// Failed ticks since the last success.
    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Whether failures have passed the threshold.
    pub fn is_escalated(&self) -> bool {
        self.consecutive > self.threshold
    }

    /// Classify the current failure streak.
    ///
    /// `is_minimized` is only queried once the streak is past the threshold.
    pub fn classify(&self, is_minimized: impl FnOnce() -> bool) -> Option<FailureKind> {
        if !self.is_escalated() {
            return None;
        }

        if is_minimized() {
            Some(FailureKind::TargetMinimized)
        } else {
            Some(FailureKind::RepeatedFailure)
        }
    }
}
