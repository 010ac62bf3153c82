//! Domain model (ids, users, events, errors).

pub mod errors;
pub mod events;
pub mod ids;
pub mod user;

pub use self::errors::{FailureKind, RegistryError, SubscriberError};
pub use self::events::{DomainEvent, EventKind};
pub use self::ids::UserId;
pub use self::user::{User, UserPatch};
