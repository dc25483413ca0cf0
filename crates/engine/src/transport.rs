//! Transport port: delivers one rendered message.

use async_trait::async_trait;

use crate::error::DeliveryError;

/// One fully rendered message, ready for submission. The signature
/// payload, when any, is already inlined into `html` by the dispatch
/// loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Sender alias used as the From header.
    pub from: String,
    /// Sole destination address.
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Plain-text alternative; when present the message goes out as
    /// multipart/alternative.
    pub plain: Option<String>,
}

/// Mail submission service.
///
/// `send` resolves only once the remote has accepted or refused the
/// message; the dispatch loop awaits one send at a time, so delivery is
/// strictly sequential. Implementations map a refusal of the
/// destination address to [`DeliveryError::Rejected`] and everything
/// else to [`DeliveryError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}
