//! User infrastructure module
//!
//! This module provides the keyed credential hasher, the PostgreSQL and
//! in-memory user stores, and the user service built on top of them.

mod credential;
mod postgres_repository;
mod repository;
mod service;

pub use credential::{CredentialHasher, KeyedSha256Hasher};
pub use postgres_repository::PostgresUserStore;
pub use repository::InMemoryUserStore;
pub use service::{CreateUserRequest, Credentials, UpdateUserRequest, UserService};
