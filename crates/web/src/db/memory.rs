//! In-process user store.
//!
//! Backs the integration tests and local runs without Postgres. Uniqueness is
//! checked and the row inserted under one lock, matching the guarantee the
//! database constraint gives [`PgUserStore`](super::PgUserStore).

use async_trait::async_trait;
use tokio::sync::RwLock;

use cafe_catalog_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::User;

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether no accounts are stored.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Number of accounts registered under `email`.
    pub async fn count_email(&self, email: &Email) -> usize {
        self.users
            .read()
            .await
            .iter()
            .filter(|u| &u.email == email)
            .count()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, email: &Email, password_hash: &str) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| &u.email == email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let next_id = users.iter().map(|u| u.id.as_i32()).max().unwrap_or(0) + 1;
        let user = User {
            id: UserId::new(next_id),
            email: email.clone(),
            password_hash: password_hash.to_owned(),
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryUserStore::new();

        let a = store.create(&email("a@cafe.org"), "h1").await.unwrap();
        let b = store.create(&email("b@cafe.org"), "h2").await.unwrap();

        assert_eq!(a.id, UserId::new(1));
        assert_eq!(b.id, UserId::new(2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(&email("a@cafe.org"), "h1").await.unwrap();

        let err = store.create(&email("A@Cafe.org"), "h2").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.count_email(&email("a@cafe.org")).await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_insert_once() {
        let store = Arc::new(MemoryUserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create(&email("race@cafe.org"), "h").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookups() {
        let store = MemoryUserStore::new();
        let user = store.create(&email("a@cafe.org"), "h1").await.unwrap();

        let by_email = store.find_by_email(&email("a@cafe.org")).await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));

        let by_id = store.find_by_id(user.id).await.unwrap();
        assert_eq!(by_id.map(|u| u.email), Some(user.email));

        assert!(store.find_by_id(UserId::new(99)).await.unwrap().is_none());
        assert!(
            store
                .find_by_email(&email("nobody@cafe.org"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
