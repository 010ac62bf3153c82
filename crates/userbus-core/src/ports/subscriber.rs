//! Subscriber port - 変更通知を受け取る側の抽象化
//!
//! The dispatcher only knows this trait. Concrete kinds (email, logging,
//! slack, analytics, ...) live in `impls`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DomainEvent, SubscriberError};

/// A unit that wants to hear about registry mutations.
///
/// # Contract
/// - Called sequentially, in attachment order, from the mutating call's task.
/// - The mutation has already been applied when `on_event` runs.
/// - An `Err` (or a panic) is logged by the dispatcher and does not reach the
///   caller of `create`/`update`/`delete`.
/// - Must not call back into the `UserService` that is notifying it.
#[async_trait]
pub trait Subscriber: Send + Sync {
    async fn on_event(&self, event: &DomainEvent) -> Result<(), SubscriberError>;

    /// Name used in logs and delivery reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a subscriber.
///
/// Handles are compared by identity (`Arc::ptr_eq`), never by value.
pub type SubscriberHandle = Arc<dyn Subscriber>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserId};
    use chrono::Utc;

    struct Unnamed;

    #[async_trait]
    impl Subscriber for Unnamed {
        async fn on_event(&self, _event: &DomainEvent) -> Result<(), SubscriberError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn default_name_is_the_type_name() {
        let handle: SubscriberHandle = Arc::new(Unnamed);
        assert!(handle.name().ends_with("Unnamed"));

        let user = User::new(UserId::new(1), "Ann", "ann@x.io", Utc::now());
        let event = DomainEvent::created(&user, Utc::now());
        assert!(handle.on_event(&event).await.is_ok());
    }
}
