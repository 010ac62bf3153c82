//! RecordingSubscriber - 受信したイベントを保持するだけの購読者
//!
//! Handy as a test double and for inspecting deliveries from a CLI session.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{DomainEvent, EventKind, SubscriberError};
use crate::ports::Subscriber;

pub struct RecordingSubscriber {
    name: String,
    fail: bool,
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSubscriber {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fail: false,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Records every event, then reports a failure for it.
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.lock().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.lock().iter().map(DomainEvent::kind).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DomainEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Subscriber for RecordingSubscriber {
    async fn on_event(&self, event: &DomainEvent) -> Result<(), SubscriberError> {
        self.lock().push(event.clone());
        if self.fail {
            return Err(SubscriberError::new(&self.name, "configured to fail"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserId};
    use chrono::Utc;

    #[tokio::test]
    async fn records_and_optionally_fails() {
        let user = User::new(UserId::new(1), "Ann", "ann@x.io", Utc::now());
        let event = DomainEvent::created(&user, Utc::now());

        let ok = RecordingSubscriber::new("ok");
        assert!(ok.on_event(&event).await.is_ok());
        assert_eq!(ok.kinds(), vec![EventKind::Created]);

        let failing = RecordingSubscriber::failing("bad");
        let err = failing.on_event(&event).await.unwrap_err();
        assert_eq!(err.subscriber(), "bad");
        assert_eq!(failing.events().len(), 1);

        failing.clear();
        assert!(failing.events().is_empty());
    }
}
