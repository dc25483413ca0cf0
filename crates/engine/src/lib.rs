//! Courier cadence engine.
//!
//! State machine and dispatch loop for a multi-step outbound email
//! cadence. One invocation processes at most one step:
//!
//! - file-backed cadence state (current step position and bound)
//! - closed-key template renderer (`{name}`, `{company}`, `{email}`)
//! - per-recipient dispatch loop with isolated failure handling
//! - ports for the external collaborators: recipient source, mail
//!   transport, run log
//!
//! The binary-side adapters (env config, CSV source, SMTP, log file)
//! live in the `courier-dispatcher` crate.

pub mod dispatch;
pub mod error;
pub mod outcome;
pub mod recipient;
pub mod runlog;
pub mod state;
pub mod template;
pub mod transport;

pub use dispatch::{DispatchSettings, Dispatcher, SIGNATURE_MARKER};
pub use error::{CadenceError, DeliveryError};
pub use outcome::{DispatchOutcome, RunReport, RunSummary};
pub use recipient::{Recipient, RecipientSource};
pub use runlog::{RunEvent, RunLog};
pub use state::{CadenceState, FileStateStore};
pub use template::{render, StepTemplates};
pub use transport::{OutboundMessage, Transport};
