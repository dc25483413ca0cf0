//! Courier dispatcher.
//!
//! Binary-side adapters around the cadence engine:
//! - environment configuration (`.env` + env vars)
//! - CSV recipient source
//! - SMTP transport (lettre, STARTTLS)
//! - append-only run-log file

pub mod config;
pub mod logfile;
pub mod smtp;
pub mod source;

pub use config::DispatcherConfig;
pub use logfile::FileRunLog;
pub use smtp::SmtpMailer;
pub use source::CsvRecipientSource;
