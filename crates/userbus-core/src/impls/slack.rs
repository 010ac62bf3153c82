//! SlackSubscriber - チャンネルへの投稿

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::domain::{DomainEvent, EventKind, SubscriberError};
use crate::ports::Subscriber;

pub struct SlackSubscriber {
    channel: String,
    posted: AtomicU64,
}

impl SlackSubscriber {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            posted: AtomicU64::new(0),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::Relaxed)
    }

    pub fn render(&self, event: &DomainEvent) -> String {
        let id = event
            .user_id()
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        let verb = match event.kind() {
            EventKind::Created => "joined",
            EventKind::Updated => "was updated",
            EventKind::Deleted => "was removed",
        };
        format!("[{}] user #{id} {verb}", event.kind().topic())
    }
}

impl Default for SlackSubscriber {
    fn default() -> Self {
        Self::new("#user-events")
    }
}

#[async_trait]
impl Subscriber for SlackSubscriber {
    async fn on_event(&self, event: &DomainEvent) -> Result<(), SubscriberError> {
        let text = self.render(event);
        tracing::info!(
            target: "userbus::slack",
            channel = %self.channel,
            %text,
            "posting slack notification"
        );
        self.posted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &str {
        "slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserId};
    use chrono::Utc;

    #[tokio::test]
    async fn posts_one_line_per_event() {
        let user = User::new(UserId::new(5), "Eve", "eve@x.io", Utc::now());
        let sub = SlackSubscriber::default();
        let event = DomainEvent::created(&user, Utc::now());

        assert_eq!(sub.render(&event), "[USER_CREATED] user #5 joined");
        sub.on_event(&event).await.unwrap();
        assert_eq!(sub.posted(), 1);
        assert_eq!(sub.channel(), "#user-events");
    }
}
