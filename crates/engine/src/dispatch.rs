//! The dispatch loop: one cadence step per invocation.
//!
//! Run-level state machine:
//! `Start → CheckTerminal → {Terminate | LoadStep} → Dispatching → Advance → End`.
//! `Dispatching` sweeps every recipient exactly once, in source order,
//! isolating per-recipient failures; the position then advances by
//! exactly one regardless of how many recipients failed. The external
//! scheduler invokes the program repeatedly to progress the cadence.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{CadenceError, DeliveryError};
use crate::outcome::{DispatchOutcome, RunReport, RunSummary};
use crate::recipient::{Recipient, RecipientSource};
use crate::runlog::{RunEvent, RunLog};
use crate::state::FileStateStore;
use crate::template::{render, StepTemplates};
use crate::transport::{OutboundMessage, Transport};

/// Marker replaced with the base64 signature image payload after
/// rendering. This is a post-render step owned by the dispatch loop,
/// not a placeholder: the marker is an HTML comment, so a body without
/// a configured signature still renders as valid HTML.
pub const SIGNATURE_MARKER: &str = "<!--SIGNATURE_BASE64-->";

/// Per-run settings, resolved once by the caller and passed in. No
/// ambient state is consulted past construction.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Directory the step body templates live in.
    pub sequence_dir: PathBuf,
    /// Sender alias used as the From header.
    pub sender: String,
    /// Base64 signature image payload inlined at [`SIGNATURE_MARKER`].
    pub signature_base64: Option<String>,
}

/// Drives one cadence step across every recipient.
pub struct Dispatcher {
    store: FileStateStore,
    source: Arc<dyn RecipientSource>,
    transport: Arc<dyn Transport>,
    log: Arc<dyn RunLog>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        store: FileStateStore,
        source: Arc<dyn RecipientSource>,
        transport: Arc<dyn Transport>,
        log: Arc<dyn RunLog>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            store,
            source,
            transport,
            log,
            settings,
        }
    }

    /// Execute one run.
    ///
    /// A returned error is a setup failure: nothing was dispatched and
    /// the cadence position was not advanced. Per-recipient failures
    /// never surface here; they are classified into outcomes and the
    /// run still completes and advances.
    pub async fn run(&self) -> Result<RunReport, CadenceError> {
        let started = Instant::now();
        let mut state = self.store.load()?;

        if state.is_complete() {
            tracing::info!(position = state.position, limit = state.limit, "sequence complete");
            self.log_event(&RunEvent::SequenceComplete);
            return Ok(RunReport::SequenceComplete);
        }

        let templates = StepTemplates::load(&self.settings.sequence_dir, &state)?;
        let rows = self.source.load()?;

        tracing::info!(
            step = state.position + 1,
            limit = state.limit,
            recipients = rows.len(),
            "dispatching step"
        );
        self.log_event(&RunEvent::RunStarted {
            position: state.position,
            limit: state.limit,
        });

        let mut outcomes = Vec::with_capacity(rows.len());
        let mut summary = RunSummary::default();
        for row in rows {
            let (name, company, outcome) = match row {
                Ok(recipient) => {
                    let outcome = self.dispatch_one(&templates, &recipient).await;
                    (recipient.name, recipient.company, outcome)
                }
                // A malformed row is attempted-and-failed, not skipped:
                // it still produces its own log entry.
                Err(e) => (
                    "<unknown>".to_string(),
                    "<unknown>".to_string(),
                    DispatchOutcome::Failed(e.to_string()),
                ),
            };

            summary.record(&outcome);
            self.log_event(&RunEvent::Dispatched {
                name,
                company,
                outcome: outcome.clone(),
            });
            outcomes.push(outcome);
        }

        let position = state.position;
        state.advance();
        self.store.save(&state)?;

        let elapsed = started.elapsed();
        tracing::info!(
            step = position + 1,
            sent = summary.sent,
            rejected = summary.rejected,
            failed = summary.failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "step dispatched"
        );
        self.log_event(&RunEvent::RunFinished {
            summary: summary.clone(),
            elapsed,
        });

        Ok(RunReport::StepDispatched {
            position,
            outcomes,
            summary,
            elapsed,
        })
    }

    /// Attempt exactly one delivery and classify the result.
    async fn dispatch_one(
        &self,
        templates: &StepTemplates,
        recipient: &Recipient,
    ) -> DispatchOutcome {
        match self.attempt(templates, recipient).await {
            Ok(()) => {
                tracing::debug!(email = %recipient.email, "sent");
                DispatchOutcome::Sent
            }
            Err(DeliveryError::Rejected(reason)) => {
                tracing::warn!(email = %recipient.email, reason = %reason, "recipient rejected");
                DispatchOutcome::Rejected(reason)
            }
            Err(e) => {
                tracing::error!(email = %recipient.email, error = %e, "delivery failed");
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn attempt(
        &self,
        templates: &StepTemplates,
        recipient: &Recipient,
    ) -> Result<(), DeliveryError> {
        let subject = render(&templates.subject, recipient)?;
        let mut html = render(&templates.html, recipient)?;
        if let Some(payload) = &self.settings.signature_base64 {
            html = html.replace(SIGNATURE_MARKER, payload);
        }
        let plain = templates
            .plain
            .as_deref()
            .map(|t| render(t, recipient))
            .transpose()?;

        let message = OutboundMessage {
            from: self.settings.sender.clone(),
            to: recipient.email.clone(),
            subject,
            html,
            plain,
        };
        self.transport.send(&message).await
    }

    /// The audit trail must not take the run down with it: an append
    /// failure is reported on the diagnostic channel and the run goes on.
    fn log_event(&self, event: &RunEvent) {
        if let Err(e) = self.log.append(event) {
            tracing::warn!(error = %e, event = %event, "run log append failed");
        }
    }
}
