//! SMTP transport adapter.
//!
//! STARTTLS submission via lettre, one message at a time. Outcome
//! mapping: an unparseable destination address or a permanent (5xx)
//! SMTP response counts as the recipient being refused; anything else
//! (connectivity, authentication, transient responses) is a transport
//! failure.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use courier_engine::{DeliveryError, OutboundMessage, Transport};

use crate::config::DispatcherConfig;

/// Submits rendered messages over SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &DispatcherConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .with_context(|| format!("SMTP relay {}", config.smtp_server))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();
        Ok(Self { transport })
    }
}

#[async_trait]
impl Transport for SmtpMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let email = build_message(message)?;
        match self.transport.send(email).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_permanent() => Err(DeliveryError::Rejected(e.to_string())),
            Err(e) => Err(DeliveryError::Transport(e.to_string())),
        }
    }
}

fn build_message(message: &OutboundMessage) -> Result<Message, DeliveryError> {
    let from: Mailbox = message
        .from
        .parse()
        .map_err(|e| DeliveryError::Transport(format!("sender alias {}: {e}", message.from)))?;
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|e| DeliveryError::Rejected(format!("invalid address {}: {e}", message.to)))?;

    let builder = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.as_str());

    match &message.plain {
        Some(plain) => builder
            .multipart(MultiPart::alternative_plain_html(
                plain.clone(),
                message.html.clone(),
            ))
            .map_err(|e| DeliveryError::Transport(e.to_string())),
        None => builder
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| DeliveryError::Transport(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbound(plain: Option<&str>) -> OutboundMessage {
        OutboundMessage {
            from: "Andreza <hello@acme.com>".into(),
            to: "ana@acme.com".into(),
            subject: "Intro".into(),
            html: "<p>hi</p>".into(),
            plain: plain.map(str::to_string),
        }
    }

    #[test]
    fn test_html_only_message_builds() {
        let email = build_message(&outbound(None)).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("Subject: Intro"));
    }

    #[test]
    fn test_plain_variant_becomes_multipart_alternative() {
        let email = build_message(&outbound(Some("hi"))).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn test_invalid_destination_is_rejected() {
        let mut message = outbound(None);
        message.to = "not-an-address".into();
        assert!(matches!(
            build_message(&message),
            Err(DeliveryError::Rejected(_))
        ));
    }

    #[test]
    fn test_invalid_sender_is_transport_error() {
        let mut message = outbound(None);
        message.from = "<<broken".into();
        assert!(matches!(
            build_message(&message),
            Err(DeliveryError::Transport(_))
        ));
    }
}
