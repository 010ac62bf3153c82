//! SubscriberCatalog - タグ文字列から購読者ハンドルへの対応表
//!
//! The request layer refers to subscribers by tag (`"email"`, `"slack"`, ...).
//! The catalog is filled once at startup and is read-only afterwards; each
//! kind maps to exactly one long-lived handle, so attaching the same tag twice
//! yields the same handle (identity).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::impls::{AnalyticsSubscriber, EmailSubscriber, LoggingSubscriber, SlackSubscriber};
use crate::ports::SubscriberHandle;

/// Closed set of subscriber kinds the request layer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberKind {
    Email,
    Logging,
    Slack,
    Analytics,
}

impl SubscriberKind {
    pub const ALL: [SubscriberKind; 4] = [
        SubscriberKind::Email,
        SubscriberKind::Logging,
        SubscriberKind::Slack,
        SubscriberKind::Analytics,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            SubscriberKind::Email => "email",
            SubscriberKind::Logging => "logging",
            SubscriberKind::Slack => "slack",
            SubscriberKind::Analytics => "analytics",
        }
    }
}

impl fmt::Display for SubscriberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subscriber tag '{0}'")]
pub struct UnknownTag(pub String);

impl FromStr for SubscriberKind {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubscriberKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("subscriber kind '{0}' is already registered")]
    AlreadyRegistered(SubscriberKind),
}

/// Kind → handle lookup table.
#[derive(Default)]
pub struct SubscriberCatalog {
    handles: HashMap<SubscriberKind, SubscriberHandle>,
}

impl SubscriberCatalog {
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    /// One instance of each built-in subscriber.
    pub fn with_defaults() -> Self {
        let mut handles: HashMap<SubscriberKind, SubscriberHandle> = HashMap::new();
        handles.insert(SubscriberKind::Email, Arc::new(EmailSubscriber::default()));
        handles.insert(SubscriberKind::Logging, Arc::new(LoggingSubscriber::new()));
        handles.insert(SubscriberKind::Slack, Arc::new(SlackSubscriber::default()));
        handles.insert(SubscriberKind::Analytics, Arc::new(AnalyticsSubscriber::new()));
        Self { handles }
    }

    pub fn register(
        &mut self,
        kind: SubscriberKind,
        handle: SubscriberHandle,
    ) -> Result<(), CatalogError> {
        if self.handles.contains_key(&kind) {
            return Err(CatalogError::AlreadyRegistered(kind));
        }
        self.handles.insert(kind, handle);
        Ok(())
    }

    pub fn get(&self, kind: SubscriberKind) -> Option<SubscriberHandle> {
        self.handles.get(&kind).cloned()
    }

    /// Resolve a tag string; `None` for unknown or unregistered tags.
    pub fn resolve(&self, tag: &str) -> Option<(SubscriberKind, SubscriberHandle)> {
        let kind = tag.parse::<SubscriberKind>().ok()?;
        self.get(kind).map(|handle| (kind, handle))
    }

    /// Registered kinds, sorted.
    pub fn registered_kinds(&self) -> Vec<SubscriberKind> {
        let mut kinds: Vec<_> = self.handles.keys().copied().collect();
        kinds.sort();
        kinds
    }
}
