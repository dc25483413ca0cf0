//! Dispatcher configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Everything a run needs, resolved once at startup and passed into the
/// dispatcher and transport constructors. Nothing reads the environment
/// past this point.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// SMTP relay host.
    pub smtp_server: String,

    /// SMTP submission port (STARTTLS).
    pub smtp_port: u16,

    /// SMTP login user.
    pub smtp_username: String,

    /// SMTP login password.
    pub smtp_password: String,

    /// Sender alias used as the From header, e.g. `Name <addr@host>`.
    pub alias: String,

    /// Cadence state record (JSON).
    pub state_path: PathBuf,

    /// Recipient table (CSV with NOME/EMPRESA/EMAIL headers).
    pub recipients_path: PathBuf,

    /// Directory holding the per-step body templates.
    pub sequence_dir: PathBuf,

    /// Append-only run log.
    pub log_path: PathBuf,

    /// Signature image inlined into HTML bodies, when set.
    pub signature_path: Option<PathBuf>,
}

impl DispatcherConfig {
    /// Load configuration from environment variables (after `.env` has
    /// been applied). Credentials are required; paths have defaults
    /// relative to the working directory.
    pub fn from_env() -> Result<Self> {
        let smtp_server = std::env::var("SMTP_SERVER").context("SMTP_SERVER is not set")?;
        let smtp_port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(587);
        let smtp_username = std::env::var("EMAIL_USER").context("EMAIL_USER is not set")?;
        let smtp_password = std::env::var("EMAIL_PASSWORD").context("EMAIL_PASSWORD is not set")?;
        let alias = std::env::var("ALIAS").unwrap_or_else(|_| smtp_username.clone());

        Ok(Self {
            smtp_server,
            smtp_port,
            smtp_username,
            smtp_password,
            alias,
            state_path: path_var("COURIER_STATE", "state.json"),
            recipients_path: path_var("COURIER_RECIPIENTS", "data.csv"),
            sequence_dir: path_var("COURIER_SEQUENCE_DIR", "sequence"),
            log_path: path_var("COURIER_LOG", "log.txt"),
            signature_path: std::env::var("COURIER_SIGNATURE").ok().map(PathBuf::from),
        })
    }
}

fn path_var(name: &str, default: &str) -> PathBuf {
    std::env::var(name)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
