//! User store gateway trait

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use super::entity::{InsertedUser, NewUser, User, UserChanges, UserId};

/// Errors reported by a user store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A write collided with a uniqueness constraint
    #[error("Unique constraint violation: {constraint}")]
    UniqueViolation { constraint: String },

    /// Anything else the backend reported
    #[error("Store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn unique_violation(constraint: impl Into<String>) -> Self {
        Self::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

/// Persistence gateway for users
///
/// Every method is a single round-trip. Uniqueness of `email` is enforced by
/// the store itself and surfaces as [`StoreError::UniqueViolation`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in the store's natural order
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Look up a user by email, optionally ignoring one id
    async fn find_by_email(
        &self,
        email: &str,
        excluding: Option<UserId>,
    ) -> Result<Option<User>, StoreError>;

    async fn insert(&self, user: NewUser) -> Result<InsertedUser, StoreError>;

    /// Apply the set fields of `changes`; returns the affected row count
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<u64, StoreError>;

    /// Returns the affected row count
    async fn delete(&self, id: UserId) -> Result<u64, StoreError>;

    /// Cheap connectivity check
    async fn ping(&self) -> Result<(), StoreError>;
}
