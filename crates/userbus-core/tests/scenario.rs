use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use userbus_core::domain::SubscriberError;
use userbus_core::impls::RecordingSubscriber;
use userbus_core::ports::FixedClock;
use userbus_core::{
    DomainEvent, EventKind, RegistryError, Subscriber, SubscriberHandle, UserId, UserPatch,
    UserService,
};

type DeliveryLog = Arc<Mutex<Vec<(&'static str, EventKind, String)>>>;

/// Appends `(label, kind, email after the change)` to a log shared with other subscribers.
struct Ordered {
    label: &'static str,
    log: DeliveryLog,
}

#[async_trait]
impl Subscriber for Ordered {
    async fn on_event(&self, event: &DomainEvent) -> Result<(), SubscriberError> {
        let payload = event.payload();
        let email = payload
            .get("after")
            .or_else(|| payload.get("snapshot"))
            .and_then(|user| user["email"].as_str())
            .unwrap_or_default()
            .to_string();
        self.log.lock().unwrap().push((self.label, event.kind(), email));
        Ok(())
    }

    fn name(&self) -> &str {
        self.label
    }
}

fn service() -> UserService {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
    UserService::with_clock(Arc::new(FixedClock::new(at)))
}

#[tokio::test]
async fn create_update_delete_with_two_subscribers() {
    let svc = service();
    let a = Arc::new(RecordingSubscriber::new("A"));
    let b = Arc::new(RecordingSubscriber::new("B"));
    svc.attach(a.clone()).await;
    svc.attach(b.clone()).await;

    let ann = svc.create("Ann", "ann@x.io").await;
    assert_eq!(ann.id(), UserId::new(1));
    for sub in [&a, &b] {
        let events = sub.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::Created);
        assert_eq!(events[0].payload()["id"], 1);
    }

    let updated = svc
        .update(ann.id(), &UserPatch::new().email("a@x.io"))
        .await
        .unwrap();
    assert_eq!(updated.email(), "a@x.io");
    assert_eq!(updated.name(), "Ann");
    for sub in [&a, &b] {
        let events = sub.events();
        assert_eq!(events.len(), 2);
        let update = &events[1];
        assert_eq!(update.kind(), EventKind::Updated);
        assert_ne!(
            update.payload()["before"]["email"],
            update.payload()["after"]["email"]
        );
    }

    let deleted = svc.delete(ann.id()).await.unwrap();
    assert_eq!(deleted, updated);
    assert_eq!(svc.read(ann.id()).await, Err(RegistryError::NotFound(ann.id())));
    assert_eq!(
        a.kinds(),
        vec![EventKind::Created, EventKind::Updated, EventKind::Deleted]
    );
    assert_eq!(a.events(), b.events());
}

#[tokio::test]
async fn failing_first_subscriber_does_not_block_the_second() {
    let svc = service();
    let failing: SubscriberHandle = Arc::new(RecordingSubscriber::failing("flaky"));
    let steady = Arc::new(RecordingSubscriber::new("steady"));
    svc.attach(failing).await;
    svc.attach(steady.clone()).await;

    let user = svc.create("Bob", "bob@x.io").await;
    let updated = svc
        .update(user.id(), &UserPatch::new().name("Robert"))
        .await
        .unwrap();

    assert_eq!(updated.name(), "Robert");
    assert_eq!(steady.kinds(), vec![EventKind::Created, EventKind::Updated]);
}

#[tokio::test]
async fn delete_of_absent_id_leaves_registry_unchanged() {
    let svc = service();
    let watcher = Arc::new(RecordingSubscriber::new("watcher"));
    svc.create("Ann", "ann@x.io").await;
    svc.attach(watcher.clone()).await;

    let result = svc.delete(UserId::new(42)).await;

    assert_eq!(result, Err(RegistryError::NotFound(UserId::new(42))));
    assert_eq!(svc.len().await, 1);
    assert!(watcher.events().is_empty());
}

#[tokio::test]
async fn update_notifies_in_attachment_order_before_returning() {
    let svc = service();
    let log = DeliveryLog::default();
    for label in ["A", "B"] {
        svc.attach(Arc::new(Ordered {
            label,
            log: log.clone(),
        }))
        .await;
    }

    let ann = svc.create("Ann", "ann@x.io").await;
    log.lock().unwrap().clear();

    let updated = svc
        .update(ann.id(), &UserPatch::new().email("a@x.io"))
        .await
        .unwrap();

    let delivered = log.lock().unwrap().clone();
    assert_eq!(
        delivered,
        vec![
            ("A", EventKind::Updated, "a@x.io".to_string()),
            ("B", EventKind::Updated, "a@x.io".to_string()),
        ]
    );
    assert_eq!(updated.email(), "a@x.io");
}
