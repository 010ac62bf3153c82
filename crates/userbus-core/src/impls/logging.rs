//! LoggingSubscriber - 全イベントをログに出す

use async_trait::async_trait;

use crate::domain::{DomainEvent, SubscriberError};
use crate::ports::Subscriber;

#[derive(Debug, Default)]
pub struct LoggingSubscriber;

impl LoggingSubscriber {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscriber for LoggingSubscriber {
    async fn on_event(&self, event: &DomainEvent) -> Result<(), SubscriberError> {
        let payload = serde_json::to_string(event.payload())
            .map_err(|e| SubscriberError::new(self.name(), format!("payload encode: {e}")))?;
        tracing::info!(
            target: "userbus::log",
            topic = event.kind().topic(),
            at = %event.timestamp().to_rfc3339(),
            %payload,
            "event logged"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "logging"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserId};
    use chrono::Utc;

    #[tokio::test]
    async fn logging_never_fails_on_regular_events() {
        let user = User::new(UserId::new(3), "Cy", "cy@x.io", Utc::now());
        let sub = LoggingSubscriber::new();

        assert!(sub.on_event(&DomainEvent::deleted(&user, Utc::now())).await.is_ok());
        assert_eq!(sub.name(), "logging");
    }
}
