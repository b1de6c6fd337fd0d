//! User service: resource operations and credential checks

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::user::{
    supplied, NewUser, StoreError, User, UserChanges, UserId, UserIdentity,
    UserStore,
};
use crate::domain::DomainError;

use super::credential::CredentialHasher;

const USER_NOT_FOUND: &str = "User not found";
const EMAIL_IN_USE: &str = "Email already in use";
const EMAIL_IN_USE_BY_OTHER: &str = "Email already in use by another user";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Request for creating a new user
///
/// Fields come straight from an untrusted body, so all are optional here and
/// checked by the service.
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request for updating a user; only supplied fields change
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login credentials
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User service for resource management and login checks
#[derive(Debug)]
pub struct UserService<S: UserStore, H: CredentialHasher> {
    store: Arc<S>,
    hasher: Arc<H>,
}

impl<S: UserStore, H: CredentialHasher> UserService<S, H> {
    /// Create a new user service
    pub fn new(store: Arc<S>, hasher: Arc<H>) -> Self {
        Self { store, hasher }
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.store
            .find_all()
            .await
            .map_err(|e| internal(e, "Error retrieving users"))
    }

    /// Get a user by ID
    ///
    /// An id that cannot name a stored row resolves to `NotFound`.
    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        let user_id = parse_id(id)?;

        self.store
            .find_by_id(user_id)
            .await
            .map_err(|e| internal(e, "Error retrieving user"))?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserIdentity, DomainError> {
        let (Some(name), Some(email), Some(password)) = (
            supplied(request.name),
            supplied(request.email),
            supplied(request.password),
        ) else {
            return Err(DomainError::invalid_input(
                "Missing required fields: name, email, password",
            ));
        };

        let existing = self
            .store
            .find_by_email(&email, None)
            .await
            .map_err(|e| internal(e, "Error creating user"))?;

        if existing.is_some() {
            warn!("Create rejected: email already in use");
            return Err(DomainError::conflict(EMAIL_IN_USE));
        }

        let credential_hash = self.hasher.hash(&password);

        // The pre-check above can race with another insert; the store's
        // constraint decides.
        let inserted = self
            .store
            .insert(NewUser {
                name: name.clone(),
                email: email.clone(),
                credential_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation { .. } => {
                    warn!("Create lost uniqueness race");
                    DomainError::conflict(EMAIL_IN_USE)
                }
                other => internal(other, "Error creating user"),
            })?;

        info!(user_id = %inserted.id, "User created");

        Ok(UserIdentity {
            id: inserted.id,
            name,
            email,
        })
    }

    /// Update the supplied fields of a user
    ///
    /// Empty strings count as not supplied.
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<UserId, DomainError> {
        let changes = UserChanges {
            name: supplied(request.name),
            email: supplied(request.email),
            credential_hash: supplied(request.password).map(|p| self.hasher.hash(&p)),
        };

        if changes.is_empty() {
            return Err(DomainError::invalid_input("No fields provided for update"));
        }

        let user_id = parse_id(id)?;

        let exists = self
            .store
            .find_by_id(user_id)
            .await
            .map_err(|e| internal(e, "Error updating user"))?
            .is_some();

        if !exists {
            return Err(DomainError::not_found(USER_NOT_FOUND));
        }

        if let Some(email) = &changes.email {
            let taken = self
                .store
                .find_by_email(email, Some(user_id))
                .await
                .map_err(|e| internal(e, "Error updating user"))?;

            if taken.is_some() {
                warn!(user_id = %user_id, "Update rejected: email owned by another user");
                return Err(DomainError::conflict(EMAIL_IN_USE_BY_OTHER));
            }
        }

        let affected = self
            .store
            .update(user_id, changes)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation { .. } => {
                    warn!(user_id = %user_id, "Update lost uniqueness race");
                    DomainError::conflict(EMAIL_IN_USE_BY_OTHER)
                }
                other => internal(other, "Error updating user"),
            })?;

        // Deleted between the existence check and the write
        if affected == 0 {
            return Err(DomainError::not_found("User not found or no changes made"));
        }

        info!(user_id = %user_id, "User updated");
        Ok(user_id)
    }

    /// Delete a user
    pub async fn delete(&self, id: &str) -> Result<UserId, DomainError> {
        let user_id = parse_id(id)?;

        let affected = self
            .store
            .delete(user_id)
            .await
            .map_err(|e| internal(e, "Error deleting user"))?;

        if affected == 0 {
            return Err(DomainError::not_found(USER_NOT_FOUND));
        }

        info!(user_id = %user_id, "User deleted");
        Ok(user_id)
    }

    /// Check an email/password pair
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn verify_credentials(
        &self,
        credentials: Credentials,
    ) -> Result<UserIdentity, DomainError> {
        let (Some(email), Some(password)) =
            (supplied(credentials.email), supplied(credentials.password))
        else {
            return Err(DomainError::invalid_input("Email and password are required"));
        };

        let user = self
            .store
            .find_by_email(&email, None)
            .await
            .map_err(|e| internal(e, "Login failed due to server error"))?;

        let Some(user) = user else {
            warn!("Login rejected");
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify(&password, user.credential_hash()) {
            warn!("Login rejected");
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        debug!(user_id = %user.id(), "Login accepted");
        Ok(UserIdentity::from(&user))
    }

    /// Check that the store answers
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.store
            .ping()
            .await
            .map_err(|e| internal(e, "Database unavailable"))
    }
}

fn parse_id(id: &str) -> Result<UserId, DomainError> {
    id.parse::<UserId>().map_err(|_| {
        debug!(id = %id, "Unparseable user id");
        DomainError::not_found(USER_NOT_FOUND)
    })
}

/// Log the store detail and hand back an opaque failure
fn internal(err: StoreError, message: &str) -> DomainError {
    error!(error = %err, "{}", message);
    DomainError::internal(message)
}
