//! User resource and login endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{User, UserId, UserIdentity};
use crate::infrastructure::user::{CreateUserRequest, Credentials, UpdateUserRequest};

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/login", post(login))
}

/// Body for create and update; every field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response for a created user
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

/// Response for update and delete
#[derive(Debug, Serialize)]
pub struct UserActionResponse {
    pub message: String,
    pub id: UserId,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserIdentity,
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    debug!("Listing users");

    let users = state.user_service.list().await?;
    Ok(Json(users))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    debug!(id = %id, "Getting user");

    let user = state.user_service.get(&id).await?;
    Ok(Json(user))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let created = state
        .user_service
        .create(CreateUserRequest {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            message: "User created successfully".to_string(),
            user_id: created.id,
            name: created.name,
            email: created.email,
        }),
    ))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<UserActionResponse>, ApiError> {
    debug!(id = %id, "Updating user");

    let id = state
        .user_service
        .update(
            &id,
            UpdateUserRequest {
                name: payload.name,
                email: payload.email,
                password: payload.password,
            },
        )
        .await?;

    Ok(Json(UserActionResponse {
        message: "User updated successfully".to_string(),
        id,
    }))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserActionResponse>, ApiError> {
    debug!(id = %id, "Deleting user");

    let id = state.user_service.delete(&id).await?;

    Ok(Json(UserActionResponse {
        message: "User deleted successfully".to_string(),
        id,
    }))
}

/// POST /login
///
/// Only checks the credentials; no session or token is issued.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .verify_credentials(Credentials {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user,
    }))
}
