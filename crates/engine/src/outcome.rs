//! Per-recipient dispatch outcomes and run-level reporting.

use std::time::Duration;

/// Classification of one delivery attempt. Logged, never persisted;
/// lives only for the duration of one recipient's processing plus the
/// run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Clean submission.
    Sent,
    /// The remote refused the destination address itself.
    Rejected(String),
    /// Render failure, row failure, or any other delivery error.
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Aggregate counts for one run's dispatch phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Sent => self.sent += 1,
            DispatchOutcome::Rejected(_) => self.rejected += 1,
            DispatchOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn attempted(&self) -> usize {
        self.sent + self.rejected + self.failed
    }
}

/// What one invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// The cadence was already terminal; nothing was loaded or sent and
    /// the state was not rewritten.
    SequenceComplete,

    /// One step was dispatched over all recipients and the position
    /// advanced by exactly one, whatever the per-recipient outcomes.
    StepDispatched {
        /// The step that was dispatched (zero-based).
        position: u32,
        outcomes: Vec<DispatchOutcome>,
        summary: RunSummary,
        elapsed: Duration,
    },
}
