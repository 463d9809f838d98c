//! Mail transport
//!
//! The [`Mailer`] trait is the seam between the reminder pipeline and
//! the outside world. [`SmtpMailer`] sends through an SMTP relay via
//! `lettre`; the transport is constructed explicitly at bootstrap and
//! injected into the dispatcher.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::{Error, Result};

/// One rendered reminder, addressed and ready to send
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Outbound mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Attempt a single send; no retries
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}

/// SMTP transport settings
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    /// SMTP port (default: 587)
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender mailbox, e.g. `Task Board <noreply@example.com>`
    pub from: String,
}

/// SMTP mailer backed by a STARTTLS relay
pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let from: Mailbox = settings.from.parse().map_err(|e| {
            Error::Config(format!("invalid sender address '{}': {e}", settings.from))
        })?;

        let creds = Credentials::new(settings.username.clone(), settings.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| Error::Mail(format!("SMTP transport error: {e}")))?
            .port(settings.port)
            .credentials(creds)
            .build();

        Ok(Self { from, transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let to: Mailbox = email.to.parse().map_err(|e| {
            Error::Config(format!("invalid recipient address '{}': {e}", email.to))
        })?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
            .map_err(|e| Error::Mail(format!("failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::Mail(format!("email send failed: {e}")))?;

        Ok(())
    }
}
