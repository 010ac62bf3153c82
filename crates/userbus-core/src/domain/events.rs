//! Events - registry の変更通知
//!
//! One `DomainEvent` is built per mutation and handed to the dispatcher. It is
//! an immutable value: subscribers only ever see `&DomainEvent`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::{User, UserId};

/// Which registry mutation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Deleted => "deleted",
        }
    }

    /// Topic name used in log lines (`USER_CREATED`, ...).
    pub fn topic(self) -> &'static str {
        match self {
            EventKind::Created => "USER_CREATED",
            EventKind::Updated => "USER_UPDATED",
            EventKind::Deleted => "USER_DELETED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification of one registry mutation.
///
/// Payload keys:
/// - `created` / `deleted`: `id`, `snapshot`
/// - `updated`: `id`, `before`, `after`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    kind: EventKind,
    payload: Map<String, Value>,
    timestamp: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(kind: EventKind, payload: Map<String, Value>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            payload,
            timestamp,
        }
    }

    pub fn created(user: &User, timestamp: DateTime<Utc>) -> Self {
        let mut payload = Map::new();
        payload.insert("id".into(), Value::from(user.id().get()));
        payload.insert("snapshot".into(), snapshot(user));
        Self::new(EventKind::Created, payload, timestamp)
    }

    pub fn updated(before: &User, after: &User, timestamp: DateTime<Utc>) -> Self {
        let mut payload = Map::new();
        payload.insert("id".into(), Value::from(after.id().get()));
        payload.insert("before".into(), snapshot(before));
        payload.insert("after".into(), snapshot(after));
        Self::new(EventKind::Updated, payload, timestamp)
    }

    pub fn deleted(user: &User, timestamp: DateTime<Utc>) -> Self {
        let mut payload = Map::new();
        payload.insert("id".into(), Value::from(user.id().get()));
        payload.insert("snapshot".into(), snapshot(user));
        Self::new(EventKind::Deleted, payload, timestamp)
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The `id` payload entry, if it holds an integer.
    pub fn user_id(&self) -> Option<UserId> {
        self.payload.get("id").and_then(Value::as_u64).map(UserId::new)
    }
}

fn snapshot(user: &User) -> Value {
    // User is plain data (strings, integer, timestamp); serialization cannot fail.
    serde_json::to_value(user).unwrap_or(Value::Null)
}
