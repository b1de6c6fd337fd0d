//! User domain
//!
//! This module provides the user entity, the partial-update record and the
//! store gateway trait the user service persists through.

mod entity;
mod repository;
mod validation;

pub use entity::{InsertedUser, NewUser, User, UserChanges, UserId, UserIdentity};
pub use repository::{StoreError, UserStore};
pub use validation::supplied;

#[cfg(test)]
pub use repository::MockUserStore;
