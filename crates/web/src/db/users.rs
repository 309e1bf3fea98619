//! `PostgreSQL` user repository.
//!
//! Queries are checked at runtime (`sqlx::query_as`), so building the crate
//! does not need a live database.

use async_trait::async_trait;
use sqlx::PgPool;

use cafe_catalog_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::User;

/// Raw `users_cafe` row.
type UserRow = (i32, String, String);

/// Postgres-backed [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_user((id, email, password_hash): UserRow) -> Result<User, RepositoryError> {
    let email = Email::parse(&email)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))?;

    Ok(User {
        id: UserId::new(id),
        email,
        password_hash,
    })
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, email: &Email, password_hash: &str) -> Result<User, RepositoryError> {
        // The UNIQUE constraint on email is the arbiter for concurrent signups.
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO users_cafe (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash
            ",
        )
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        into_user(row)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, password_hash
            FROM users_cafe
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_user).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, password_hash
            FROM users_cafe
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_user).transpose()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
