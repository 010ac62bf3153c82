//! EventDispatcher - 購読者への逐次配送
//!
//! # Delivery rules
//! - Subscribers are invoked in attachment order.
//! - Each `on_event` is awaited to completion before the next one starts.
//! - A failing or panicking subscriber is recorded in the [`DeliveryReport`]
//!   and skipped; the remaining subscribers still receive the event.
//! - No retries.
//!
//! The dispatcher itself takes `&mut self` for attach/detach and `&self` for
//! notify; the owner decides how to serialize them (see `UserService`).

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::domain::{DomainEvent, SubscriberError};
use crate::ports::SubscriberHandle;

/// Ordered list of subscriber handles.
#[derive(Default)]
pub struct EventDispatcher {
    subscribers: Vec<SubscriberHandle>,
}

/// What happened during one `notify` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Number of subscribers invoked.
    pub attempted: usize,
    pub failures: Vec<SubscriberError>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        self.attempted - self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Append `handle`. Duplicates are allowed; use [`Self::contains`] first
    /// for idempotent attach.
    pub fn attach(&mut self, handle: SubscriberHandle) {
        tracing::debug!(subscriber = handle.name(), "subscriber attached");
        self.subscribers.push(handle);
    }

    /// Remove the first occurrence of `handle`. Returns `false` if it was not
    /// attached.
    pub fn detach(&mut self, handle: &SubscriberHandle) -> bool {
        let Some(pos) = self.position(handle) else {
            return false;
        };
        let removed = self.subscribers.remove(pos);
        tracing::debug!(subscriber = removed.name(), "subscriber detached");
        true
    }

    pub fn contains(&self, handle: &SubscriberHandle) -> bool {
        self.position(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Subscriber names in attachment order.
    pub fn names(&self) -> Vec<String> {
        self.subscribers.iter().map(|s| s.name().to_string()).collect()
    }

    /// Deliver `event` to every attached subscriber, one after another.
    pub async fn notify(&self, event: &DomainEvent) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for subscriber in &self.subscribers {
            report.attempted += 1;
            let name = subscriber.name();

            let delivery = AssertUnwindSafe(subscriber.on_event(event)).catch_unwind().await;
            let failure = match delivery {
                Ok(Ok(())) => {
                    tracing::debug!(subscriber = name, kind = %event.kind(), "event delivered");
                    continue;
                }
                Ok(Err(err)) => err,
                Err(panic) => SubscriberError::panicked(name, panic_message(panic.as_ref())),
            };

            tracing::warn!(
                subscriber = name,
                kind = %event.kind(),
                error = %failure,
                "subscriber failed; continuing with the next one"
            );
            report.failures.push(failure);
        }

        report
    }

    fn position(&self, handle: &SubscriberHandle) -> Option<usize> {
        self.subscribers.iter().position(|s| Arc::ptr_eq(s, handle))
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
