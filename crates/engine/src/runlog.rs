//! Run log port: the append-only human-readable audit trail.
//!
//! The run log is the product's user-visible surface (the program runs
//! unattended), distinct from `tracing` operator diagnostics. One line
//! per event; the line text is defined here via `Display`, adapters add
//! the timestamp and the sink.

use std::fmt;
use std::time::Duration;

use crate::outcome::{DispatchOutcome, RunSummary};

/// One audit-trail entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// A run began dispatching the given step (zero-based) of `limit`.
    RunStarted { position: u32, limit: u32 },

    /// The cadence is terminal; nothing left to send.
    SequenceComplete,

    /// One recipient was attempted.
    Dispatched {
        name: String,
        company: String,
        outcome: DispatchOutcome,
    },

    /// The dispatch phase finished and the position advanced.
    RunFinished {
        summary: RunSummary,
        elapsed: Duration,
    },

    /// The run aborted on a setup failure or an unexpected error.
    RunFailed { error: String },
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunStarted { position, limit } => {
                write!(f, "Dispatching step {} of {limit}", position + 1)
            }
            Self::SequenceComplete => write!(f, "Sequence complete, nothing to dispatch"),
            Self::Dispatched {
                name,
                company,
                outcome,
            } => match outcome {
                DispatchOutcome::Sent => write!(f, "Email to {name} ({company}): sent"),
                DispatchOutcome::Rejected(reason) => {
                    write!(f, "Email to {name} ({company}): rejected: {reason}")
                }
                DispatchOutcome::Failed(error) => {
                    write!(f, "Email to {name} ({company}): FAILED: {error}")
                }
            },
            Self::RunFinished { summary, elapsed } => write!(
                f,
                "Step finished in {:.2}s: {} sent, {} rejected, {} failed",
                elapsed.as_secs_f64(),
                summary.sent,
                summary.rejected,
                summary.failed
            ),
            Self::RunFailed { error } => write!(f, "RUN FAILED: {error}"),
        }
    }
}

/// Append-only text sink, one line per event.
pub trait RunLog: Send + Sync {
    fn append(&self, event: &RunEvent) -> std::io::Result<()>;
}
