//! Reminder delivery
//!
//! Sends one recipient's rendered reminder through the injected mail
//! transport. Without a transport the dispatcher runs in log-only mode.
//! Transport errors are caught per recipient and never abort the batch.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::mailer::{Mailer, OutgoingEmail};

/// Outcome of one recipient's dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Skipped,
    Failed,
}

/// Per-recipient delivery with an optional transport
pub struct Dispatcher {
    mailer: Option<Arc<dyn Mailer>>,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer: Some(mailer),
        }
    }

    /// Dispatcher without a transport; logs every would-be send
    pub fn log_only() -> Self {
        Self { mailer: None }
    }

    pub fn is_log_only(&self) -> bool {
        self.mailer.is_none()
    }

    /// Attempt delivery for one recipient
    pub async fn dispatch(&self, email: OutgoingEmail) -> DeliveryOutcome {
        let Some(mailer) = &self.mailer else {
            info!(
                to = %email.to,
                subject = %email.subject,
                "reminder sending disabled; logging instead"
            );
            debug!(body = %email.text, "reminder body");
            return DeliveryOutcome::Skipped;
        };

        let to = email.to.clone();
        match mailer.send(email).await {
            Ok(()) => {
                info!(to = %to, "reminder email sent");
                DeliveryOutcome::Sent
            }
            Err(err) => {
                error!(to = %to, error = %err, "failed to send reminder");
                DeliveryOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result};
    use async_trait::async_trait;
    use tokio::sync::RwLock;

    struct RecordingMailer {
        sent: RwLock<Vec<OutgoingEmail>>,
        fail: bool,
    }

    impl RecordingMailer {
        fn new(fail: bool) -> Self {
            Self {
                sent: RwLock::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<()> {
            if self.fail {
                return Err(Error::Mail("transport unavailable".to_string()));
            }
            self.sent.write().await.push(email);
            Ok(())
        }
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "alice@example.com".to_string(),
            subject: "Task Reminder: 1 task(s) due in 1 day(s)".to_string(),
            text: "body".to_string(),
            html: "<p>body</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_log_only_dispatch_skips() {
        let dispatcher = Dispatcher::log_only();
        assert!(dispatcher.is_log_only());
        assert_eq!(dispatcher.dispatch(email()).await, DeliveryOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_dispatch_sends_through_mailer() {
        let mailer = Arc::new(RecordingMailer::new(false));
        let dispatcher = Dispatcher::new(mailer.clone());

        assert_eq!(dispatcher.dispatch(email()).await, DeliveryOutcome::Sent);
        let sent = mailer.sent.read().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
    }

    #[tokio::test]
    async fn test_transport_error_reports_failed() {
        let dispatcher = Dispatcher::new(Arc::new(RecordingMailer::new(true)));
        assert_eq!(dispatcher.dispatch(email()).await, DeliveryOutcome::Failed);
    }
}
