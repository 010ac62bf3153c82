//! EmailSubscriber - ユーザー宛てのメール通知
//!
//! Renders a message per event and hands it to the log; there is no SMTP
//! transport in this crate.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{DomainEvent, EventKind, SubscriberError};
use crate::ports::Subscriber;

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
}

pub struct EmailSubscriber {
    from: String,
    sent: AtomicU64,
}

impl EmailSubscriber {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            sent: AtomicU64::new(0),
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Build the message for `event`.
    ///
    /// The recipient is the user's current address (`after` for updates,
    /// `snapshot` otherwise).
    pub fn render(&self, event: &DomainEvent) -> Result<EmailMessage, SubscriberError> {
        let user_key = match event.kind() {
            EventKind::Updated => "after",
            EventKind::Created | EventKind::Deleted => "snapshot",
        };
        let user = event.payload().get(user_key);
        let to = user
            .and_then(|u| u.get("email"))
            .and_then(Value::as_str)
            .ok_or_else(|| SubscriberError::new(self.name(), "event carries no recipient"))?;
        let name = user
            .and_then(|u| u.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("there");

        let subject = match event.kind() {
            EventKind::Created => format!("Welcome, {name}!"),
            EventKind::Updated => format!("{name}, your profile was updated"),
            EventKind::Deleted => format!("Goodbye, {name}"),
        };

        Ok(EmailMessage {
            from: self.from.clone(),
            to: to.to_string(),
            subject,
        })
    }
}

impl Default for EmailSubscriber {
    fn default() -> Self {
        Self::new("noreply@userbus.local")
    }
}

#[async_trait]
impl Subscriber for EmailSubscriber {
    async fn on_event(&self, event: &DomainEvent) -> Result<(), SubscriberError> {
        let message = self.render(event)?;
        tracing::info!(
            target: "userbus::email",
            topic = event.kind().topic(),
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            "sending email notification"
        );
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &str {
        "email"
    }
}
