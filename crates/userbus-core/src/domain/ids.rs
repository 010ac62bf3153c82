//! Domain identifiers.
//!
//! `UserId` は registry が単調増加で払い出す整数 ID です。
//! 削除後も再利用されません（カウンタは registry 側が保持）。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user record.
///
/// Ordering follows allocation order, so a `BTreeMap<UserId, _>` iterates in
/// insertion order.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    pub const FIRST: UserId = UserId(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The id allocated right after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
