//! In-memory user store implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{
    InsertedUser, NewUser, StoreError, User, UserChanges, UserId, UserStore,
};

const EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<UserId, User>,
    next_id: i64,
}

impl Table {
    fn email_taken(&self, email: &str, excluding: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|u| u.email() == email && Some(u.id()) != excluding)
    }
}

/// In-memory implementation of UserStore
///
/// Behaves like the `users` table: ids come from a sequence that is never
/// rewound, and email uniqueness is checked inside the write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryUserStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
        excluding: Option<UserId>,
    ) -> Result<Option<User>, StoreError> {
        let table = self.table.read().await;

        Ok(table
            .rows
            .values()
            .find(|u| u.email() == email && Some(u.id()) != excluding)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<InsertedUser, StoreError> {
        let mut table = self.table.write().await;

        if table.email_taken(&user.email, None) {
            return Err(StoreError::unique_violation(EMAIL_CONSTRAINT));
        }

        table.next_id += 1;
        let id = UserId::new(table.next_id);
        let created_at = Utc::now();

        table.rows.insert(
            id,
            User::new(id, user.name, user.email, user.credential_hash, created_at),
        );

        Ok(InsertedUser { id, created_at })
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<u64, StoreError> {
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&id) {
            return Ok(0);
        }

        if let Some(email) = &changes.email {
            if table.email_taken(email, Some(id)) {
                return Err(StoreError::unique_violation(EMAIL_CONSTRAINT));
            }
        }

        match table.rows.get_mut(&id) {
            Some(user) => {
                user.apply(&changes);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: UserId) -> Result<u64, StoreError> {
        let mut table = self.table.write().await;
        Ok(u64::from(table.rows.remove(&id).is_some()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            credential_hash: "digest".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryUserStore::new();

        let inserted = store.insert(new_user("Ann", "a@x.com")).await.unwrap();
        assert_eq!(inserted.id, UserId::new(1));

        let found = store.find_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(found.name(), "Ann");
        assert_eq!(found.created_at(), inserted.created_at);

        let by_email = store.find_by_email("a@x.com", None).await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_find_by_email_excluding() {
        let store = InMemoryUserStore::new();
        let inserted = store.insert(new_user("Ann", "a@x.com")).await.unwrap();

        let found = store
            .find_by_email("a@x.com", Some(inserted.id))
            .await
            .unwrap();
        assert!(found.is_none());

        let found = store
            .find_by_email("a@x.com", Some(UserId::new(99)))
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_insert_enforces_unique_email() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("Ann", "a@x.com")).await.unwrap();

        let err = store.insert(new_user("Bob", "a@x.com")).await.unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let store = InMemoryUserStore::new();
        let first = store.insert(new_user("Ann", "a@x.com")).await.unwrap();

        assert_eq!(store.delete(first.id).await.unwrap(), 1);

        let second = store.insert(new_user("Ann", "a@x.com")).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_update_counts_rows() {
        let store = InMemoryUserStore::new();
        let inserted = store.insert(new_user("Ann", "a@x.com")).await.unwrap();

        let changes = UserChanges {
            name: Some("Annie".to_string()),
            ..Default::default()
        };

        assert_eq!(store.update(inserted.id, changes.clone()).await.unwrap(), 1);
        assert_eq!(store.update(UserId::new(99), changes).await.unwrap(), 0);

        let user = store.find_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(user.name(), "Annie");
        assert_eq!(user.email(), "a@x.com");
    }

    #[tokio::test]
    async fn test_update_enforces_unique_email() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("Ann", "a@x.com")).await.unwrap();
        let bob = store.insert(new_user("Bob", "b@x.com")).await.unwrap();

        let err = store
            .update(
                bob.id,
                UserChanges {
                    email: Some("a@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        // Re-setting one's own email is not a collision
        let rows = store
            .update(
                bob.id,
                UserChanges {
                    email: Some("b@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let store = InMemoryUserStore::new();
        let inserted = store.insert(new_user("Ann", "a@x.com")).await.unwrap();

        assert_eq!(store.delete(inserted.id).await.unwrap(), 1);
        assert_eq!(store.delete(inserted.id).await.unwrap(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_find_all_in_id_order() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("Ann", "a@x.com")).await.unwrap();
        store.insert(new_user("Bob", "b@x.com")).await.unwrap();

        let all = store.find_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(User::name).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
    }
}
