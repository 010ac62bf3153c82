//! Errors - エラー型と分類

use super::UserId;

/// Errors surfaced by the user registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("user not found: id={0}")]
    NotFound(UserId),
}

/// How a delivery to a subscriber went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// `on_event` returned an error.
    Failed,
    /// `on_event` panicked; the panic was caught by the dispatcher.
    Panicked,
}

/// Failure signal of a single delivery.
///
/// Never propagated to the registry's caller: the dispatcher records it and
/// moves on to the next subscriber.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("subscriber '{subscriber}' failed ({kind:?}): {message}")]
pub struct SubscriberError {
    subscriber: String,
    kind: FailureKind,
    message: String,
}

impl SubscriberError {
    pub fn new(subscriber: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subscriber: subscriber.into(),
            kind: FailureKind::Failed,
            message: message.into(),
        }
    }

    pub fn panicked(subscriber: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subscriber: subscriber.into(),
            kind: FailureKind::Panicked,
            message: message.into(),
        }
    }

    pub fn subscriber(&self) -> &str {
        &self.subscriber
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
