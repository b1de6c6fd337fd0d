//! PostgreSQL user store implementation

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::user::{
    InsertedUser, NewUser, StoreError, User, UserChanges, UserId, UserStore,
};

/// PostgreSQL implementation of UserStore
///
/// Expects a `users` table with a unique constraint on `email`.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to list users"))?;

        Ok(rows.iter().map(row_to_user).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to get user"))?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_by_email(
        &self,
        email: &str,
        excluding: Option<UserId>,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            "#,
        )
        .bind(email)
        .bind(excluding.map(|id| id.value()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to get user by email"))?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn insert(&self, user: NewUser) -> Result<InsertedUser, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.credential_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to create user"))?;

        Ok(InsertedUser {
            id: UserId::new(row.get("id")),
            created_at: row.get("created_at"),
        })
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<u64, StoreError> {
        let mut query = build_update(id, changes)
            .ok_or_else(|| StoreError::backend("No fields provided for update"))?;

        let result = query
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to update user"))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to delete user"))?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "Database ping failed"))?;

        Ok(())
    }
}

/// Build a parametric UPDATE touching only the set fields
///
/// Returns `None` when there is nothing to change.
fn build_update(id: UserId, changes: UserChanges) -> Option<QueryBuilder<'static, Postgres>> {
    if changes.is_empty() {
        return None;
    }

    let mut builder = QueryBuilder::new("UPDATE users SET ");
    {
        let mut fields = builder.separated(", ");

        if let Some(name) = changes.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(email) = changes.email {
            fields.push("email = ").push_bind_unseparated(email);
        }
        if let Some(hash) = changes.credential_hash {
            fields.push("password_hash = ").push_bind_unseparated(hash);
        }
    }
    builder.push(" WHERE id = ").push_bind(id.value());

    Some(builder)
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    let id: i64 = row.get("id");
    let name: String = row.get("name");
    let email: String = row.get("email");
    let password_hash: String = row.get("password_hash");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    User::new(UserId::new(id), name, email, password_hash, created_at)
}

fn classify(error: sqlx::Error, context: &str) -> StoreError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return StoreError::unique_violation(db_error.constraint().unwrap_or("users"));
        }
    }

    StoreError::backend(format!("{}: {}", context, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_update_single_field() {
        let query = build_update(
            UserId::new(3),
            UserChanges {
                name: Some("Ann".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(query.sql(), "UPDATE users SET name = $1 WHERE id = $2");
    }

    #[test]
    fn test_build_update_all_fields() {
        let query = build_update(
            UserId::new(3),
            UserChanges {
                name: Some("Ann".to_string()),
                email: Some("a@x.com".to_string()),
                credential_hash: Some("digest".to_string()),
            },
        )
        .unwrap();

        assert_eq!(
            query.sql(),
            "UPDATE users SET name = $1, email = $2, password_hash = $3 WHERE id = $4"
        );
    }

    #[test]
    fn test_build_update_values_are_bound() {
        let query = build_update(
            UserId::new(3),
            UserChanges {
                email: Some("x'; DROP TABLE users; --".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(query.sql(), "UPDATE users SET email = $1 WHERE id = $2");
        assert!(!query.sql().contains("DROP"));
    }

    #[test]
    fn test_build_update_nothing_to_change() {
        assert!(build_update(UserId::new(3), UserChanges::default()).is_none());
    }

    #[test]
    fn test_classify_non_database_error() {
        let err = classify(sqlx::Error::RowNotFound, "Failed to get user");

        assert!(!err.is_unique_violation());
        assert!(err.to_string().contains("Failed to get user"));
    }
}
