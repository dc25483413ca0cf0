//! Error taxonomy for the cadence engine.
//!
//! Two scopes, deliberately separate types:
//! - [`CadenceError`]: fatal setup errors that abort the run before any
//!   recipient is attempted and before the cadence position advances.
//! - [`DeliveryError`]: recipient-scoped errors that are turned into a
//!   per-recipient outcome and never escape the dispatch loop.

use thiserror::Error;

/// Fatal run errors. The cadence position never advances past one of these.
#[derive(Debug, Error)]
pub enum CadenceError {
    /// Cadence state record missing, unreadable or semantically invalid.
    #[error("cadence state corrupt: {0}")]
    StateCorrupt(String),

    /// Step template file missing or unreadable.
    #[error("template load failed for {path}: {source}")]
    TemplateLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The recipient source itself could not be read.
    #[error("recipient source unreadable: {0}")]
    SourceUnreadable(String),

    /// Cadence record could not be serialized for saving.
    #[error("state encode error: {0}")]
    StateEncode(#[from] serde_json::Error),

    /// State file I/O.
    #[error("state I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recipient-scoped errors, classified into a [`DispatchOutcome`] by the
/// dispatch loop.
///
/// [`DispatchOutcome`]: crate::outcome::DispatchOutcome
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A row or template references a field outside the recognized set.
    #[error("missing field: {0}")]
    MissingField(String),

    /// The remote transport refused the destination address.
    #[error("recipient rejected: {0}")]
    Rejected(String),

    /// Any other delivery error (connectivity, authentication, protocol).
    #[error("transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CadenceError::StateCorrupt("position 4 exceeds limit 3".to_string());
        assert_eq!(
            err.to_string(),
            "cadence state corrupt: position 4 exceeds limit 3"
        );

        let err = DeliveryError::MissingField("telefone".to_string());
        assert_eq!(err.to_string(), "missing field: telefone");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CadenceError = io_err.into();
        assert!(matches!(err, CadenceError::Io(_)));
    }
}
