//! Courier dispatcher binary.
//!
//! Sends one cadence step per invocation; an external scheduler runs it
//! repeatedly to progress through the full cadence. The process exits
//! cleanly in every case, including run failure: it is invoked
//! unattended, and its user-visible surface is the run log.

use std::sync::Arc;

use anyhow::{Context, Result};
use base64::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courier_dispatcher::{CsvRecipientSource, DispatcherConfig, FileRunLog, SmtpMailer};
use courier_engine::{DispatchSettings, Dispatcher, FileStateStore, RunEvent, RunLog, RunReport};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,courier_engine=debug,courier_dispatcher=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = match DispatcherConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // No run log path is trustworthy without config; diagnostics only.
            tracing::error!(error = ?e, "configuration error");
            return Ok(());
        }
    };
    tracing::info!(
        state = %config.state_path.display(),
        recipients = %config.recipients_path.display(),
        sequence = %config.sequence_dir.display(),
        "configuration loaded"
    );

    let log = Arc::new(FileRunLog::new(&config.log_path));

    if let Err(e) = run(&config, log.clone()).await {
        tracing::error!(error = ?e, "run failed");
        if let Err(log_err) = log.append(&RunEvent::RunFailed {
            error: format!("{e:#}"),
        }) {
            tracing::warn!(error = %log_err, "could not write run log");
        }
    }

    Ok(())
}

async fn run(config: &DispatcherConfig, log: Arc<FileRunLog>) -> Result<()> {
    let store = FileStateStore::new(&config.state_path);
    let source = Arc::new(CsvRecipientSource::new(&config.recipients_path));
    let transport = Arc::new(SmtpMailer::new(config)?);
    let signature_base64 = load_signature(config)?;

    let dispatcher = Dispatcher::new(
        store,
        source,
        transport,
        log,
        DispatchSettings {
            sequence_dir: config.sequence_dir.clone(),
            sender: config.alias.clone(),
            signature_base64,
        },
    );

    match dispatcher.run().await? {
        RunReport::SequenceComplete => {
            tracing::info!("cadence is complete; nothing was sent");
        }
        RunReport::StepDispatched {
            position, summary, ..
        } => {
            tracing::info!(
                step = position + 1,
                sent = summary.sent,
                rejected = summary.rejected,
                failed = summary.failed,
                "run finished"
            );
        }
    }
    Ok(())
}

/// Read and encode the signature image once per run.
fn load_signature(config: &DispatcherConfig) -> Result<Option<String>> {
    match &config.signature_path {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading signature image {}", path.display()))?;
            Ok(Some(BASE64_STANDARD.encode(bytes)))
        }
        None => Ok(None),
    }
}
