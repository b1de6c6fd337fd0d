//! User entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored user
///
/// The credential hash travels with the row so the login check can compare
/// against it, but it is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    #[serde(skip_serializing, default)]
    credential_hash: String,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        credential_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            credential_hash: credential_hash.into(),
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn credential_hash(&self) -> &str {
        &self.credential_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a set of changes in place, leaving unset fields untouched
    pub fn apply(&mut self, changes: &UserChanges) {
        if let Some(name) = &changes.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &changes.email {
            self.email.clone_from(email);
        }
        if let Some(hash) = &changes.credential_hash {
            self.credential_hash.clone_from(hash);
        }
    }
}

/// Identity returned by create and login: never carries the hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Row to insert; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub credential_hash: String,
}

/// What the store reports back after an insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedUser {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Fields to change in an update; `None` leaves the column as is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub credential_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.credential_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new(UserId::new(7), "Ann", "a@x.com", "digest", Utc::now())
    }

    #[test]
    fn test_user_id_parse() {
        assert_eq!("42".parse::<UserId>().unwrap(), UserId::new(42));
        assert_eq!(" 42 ".parse::<UserId>().unwrap(), UserId::new(42));
        assert!("abc".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn test_user_serialization_excludes_hash() {
        let user = create_test_user();

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("\"email\":\"a@x.com\""));
        assert!(json.contains("created_at"));
        assert!(!json.contains("digest"));
        assert!(!json.contains("credential_hash"));
    }

    #[test]
    fn test_apply_partial_changes() {
        let mut user = create_test_user();

        user.apply(&UserChanges {
            name: Some("Annie".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name(), "Annie");
        assert_eq!(user.email(), "a@x.com");
        assert_eq!(user.credential_hash(), "digest");
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(UserChanges::default().is_empty());
        assert!(
            !UserChanges {
                credential_hash: Some("h".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_identity_from_user() {
        let user = create_test_user();
        let identity = UserIdentity::from(&user);

        assert_eq!(identity.id, UserId::new(7));
        assert_eq!(identity.name, "Ann");

        let json = serde_json::to_string(&identity).unwrap();
        assert!(!json.contains("digest"));
    }
}
