//! User record and partial update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// A user record owned by the registry.
///
/// `id` and `created_at` are fixed at creation; only `name` and `email` can
/// change afterwards (through [`UserPatch`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Merge the fields present in `patch` into this record.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
    }
}

/// Partial update: `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn ann() -> User {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        User::new(UserId::new(1), "Ann", "ann@x.io", created_at)
    }

    #[rstest]
    #[case::name_only(UserPatch::new().name("Bea"), "Bea", "ann@x.io")]
    #[case::email_only(UserPatch::new().email("a@x.io"), "Ann", "a@x.io")]
    #[case::both(UserPatch::new().name("Bea").email("b@x.io"), "Bea", "b@x.io")]
    #[case::empty(UserPatch::new(), "Ann", "ann@x.io")]
    fn apply_merges_present_fields(
        #[case] patch: UserPatch,
        #[case] name: &str,
        #[case] email: &str,
    ) {
        let before = ann();
        let mut user = before.clone();

        user.apply(&patch);

        assert_eq!(user.name(), name);
        assert_eq!(user.email(), email);
        assert_eq!(user.id(), before.id());
        assert_eq!(user.created_at(), before.created_at());
    }

    #[test]
    fn user_wire_shape() {
        let value = serde_json::to_value(ann()).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Ann");
        assert_eq!(value["email"], "ann@x.io");
        assert_eq!(value["created_at"], "2024-01-01T12:00:00Z");
    }

    #[test]
    fn patch_omits_absent_fields() {
        let value = serde_json::to_value(UserPatch::new().email("a@x.io")).unwrap();
        assert_eq!(value, serde_json::json!({ "email": "a@x.io" }));

        let parsed: UserPatch = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
    }
}
