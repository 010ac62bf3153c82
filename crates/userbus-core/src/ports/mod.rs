//! Ports - 抽象化レイヤー
//!
//! The seams the core talks through: time, and the subscriber capability.

pub mod clock;
pub mod subscriber;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::subscriber::{Subscriber, SubscriberHandle};
