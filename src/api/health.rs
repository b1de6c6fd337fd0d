//! Liveness and connectivity endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use crate::api::types::Json;

use super::state::AppState;

/// Simple health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Database connectivity response for `/ping`
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
    pub database_status: DatabaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Connected,
    Error,
}

/// GET /
pub async fn root() -> &'static str {
    "Hello World! Welcome to the API."
}

/// GET /marco
pub async fn marco() -> &'static str {
    "polo"
}

/// GET /health - returns 200 while the process is serving
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /ping - round-trips to the store
pub async fn ping(State(state): State<AppState>) -> impl IntoResponse {
    match state.user_service.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(PingResponse {
                message: "pong",
                database_status: DatabaseStatus::Connected,
                error: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(PingResponse {
                    message: "pong",
                    database_status: DatabaseStatus::Error,
                    error: Some(e.message().to_string()),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_response_serialization() {
        let response = PingResponse {
            message: "pong",
            database_status: DatabaseStatus::Connected,
            error: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"message":"pong","database_status":"connected"}"#);
    }

    #[test]
    fn test_ping_error_serialization() {
        let response = PingResponse {
            message: "pong",
            database_status: DatabaseStatus::Error,
            error: Some("Database unavailable".to_string()),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"database_status\":\"error\""));
        assert!(json.contains("Database unavailable"));
    }
}
