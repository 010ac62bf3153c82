//! AnalyticsSubscriber - イベント種別ごとの集計

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainEvent, EventKind, SubscriberError};
use crate::ports::Subscriber;

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsCounts {
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
}

#[derive(Debug, Default)]
pub struct AnalyticsSubscriber {
    created: AtomicU64,
    updated: AtomicU64,
    deleted: AtomicU64,
}

impl AnalyticsSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> AnalyticsCounts {
        AnalyticsCounts {
            created: self.created.load(Ordering::Relaxed),
            updated: self.updated.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
        }
    }

    fn counter(&self, kind: EventKind) -> &AtomicU64 {
        match kind {
            EventKind::Created => &self.created,
            EventKind::Updated => &self.updated,
            EventKind::Deleted => &self.deleted,
        }
    }
}

#[async_trait]
impl Subscriber for AnalyticsSubscriber {
    async fn on_event(&self, event: &DomainEvent) -> Result<(), SubscriberError> {
        let total = self.counter(event.kind()).fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(
            target: "userbus::analytics",
            event = event.kind().as_str(),
            user_id = event.user_id().map(|id| id.get()),
            total,
            "tracking event"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "analytics"
    }
}
