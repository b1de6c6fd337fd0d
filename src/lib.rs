//! User Accounts API
//!
//! An HTTP service for a single user resource:
//! - Create, read, update and delete users backed by PostgreSQL
//! - Email uniqueness checked up front and enforced by the store
//! - Login checks against a keyed SHA-256 credential digest

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::StorageBackend;
use infrastructure::user::{InMemoryUserStore, KeyedSha256Hasher, PostgresUserStore, UserService};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Create the application state with the given configuration
///
/// Fails before serving anything when the hash key is missing or the
/// database cannot be reached.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(KeyedSha256Hasher::new(config.hash_key()?));

    info!("Storage backend: {:?}", config.storage.backend);

    let state = match config.storage.backend {
        StorageBackend::Postgres => {
            let database_url = config.database_url()?;

            info!("Connecting to PostgreSQL...");
            let pool = PgPoolOptions::new()
                .max_connections(config.storage.max_connections)
                .connect(&database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
            info!("PostgreSQL connection established");

            let store = Arc::new(PostgresUserStore::new(pool));
            AppState::new(Arc::new(UserService::new(store, hasher)))
        }
        StorageBackend::Memory => {
            let store = Arc::new(InMemoryUserStore::new());
            AppState::new(Arc::new(UserService::new(store, hasher)))
        }
    };

    Ok(state)
}
