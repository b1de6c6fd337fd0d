//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, User, UserId, UserIdentity, UserStore};
use crate::infrastructure::user::{
    CreateUserRequest, CredentialHasher, Credentials, UpdateUserRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>) -> Self {
        Self { user_service }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn get(&self, id: &str) -> Result<User, DomainError>;
    async fn create(&self, request: CreateUserRequest) -> Result<UserIdentity, DomainError>;
    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<UserId, DomainError>;
    async fn delete(&self, id: &str) -> Result<UserId, DomainError>;
    async fn verify_credentials(&self, credentials: Credentials)
        -> Result<UserIdentity, DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<S, H> UserServiceTrait for UserService<S, H>
where
    S: UserStore + 'static,
    H: CredentialHasher + 'static,
{
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn get(&self, id: &str) -> Result<User, DomainError> {
        UserService::get(self, id).await
    }

    async fn create(&self, request: CreateUserRequest) -> Result<UserIdentity, DomainError> {
        UserService::create(self, request).await
    }

    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<UserId, DomainError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: &str) -> Result<UserId, DomainError> {
        UserService::delete(self, id).await
    }

    async fn verify_credentials(
        &self,
        credentials: Credentials,
    ) -> Result<UserIdentity, DomainError> {
        UserService::verify_credentials(self, credentials).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        UserService::ping(self).await
    }
}
