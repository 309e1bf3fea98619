//! Database migration command.
//!
//! # Environment Variables
//!
//! - `CAFE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Account migrations live in `crates/web/migrations/`. The session table
//! belongs to `tower-sessions-sqlx-store` and is created by its own migration.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors from the migrate command.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the database URL, preferring the app-specific variable.
fn database_url(lookup: impl Fn(&str) -> Option<String>) -> Result<String, MigrationError> {
    lookup("CAFE_DATABASE_URL")
        .or_else(|| lookup("DATABASE_URL"))
        .filter(|url| !url.trim().is_empty())
        .ok_or(MigrationError::MissingEnvVar("CAFE_DATABASE_URL"))
}

/// Run all migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails or
/// a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url(|key| std::env::var(key).ok())?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running account migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_prefers_app_variable() {
        let url = database_url(|key| match key {
            "CAFE_DATABASE_URL" => Some("postgres://app/db".to_string()),
            "DATABASE_URL" => Some("postgres://fallback/db".to_string()),
            _ => None,
        });
        assert_eq!(url.ok().as_deref(), Some("postgres://app/db"));
    }

    #[test]
    fn test_database_url_fallback() {
        let url = database_url(|key| (key == "DATABASE_URL").then(|| "postgres://fly/db".to_string()));
        assert_eq!(url.ok().as_deref(), Some("postgres://fly/db"));
    }

    #[test]
    fn test_database_url_missing() {
        assert!(matches!(
            database_url(|_| None),
            Err(MigrationError::MissingEnvVar("CAFE_DATABASE_URL"))
        ));
    }
}
