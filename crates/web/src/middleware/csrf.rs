//! CSRF tokens for state-changing forms.
//!
//! One random token per session, rendered into every form as a hidden
//! `csrf_token` field and compared on submit.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Name of the hidden form field.
pub const CSRF_FIELD: &str = "csrf_token";

/// Get the session's CSRF token, creating one on first use.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn csrf_token(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(token) = session.get::<String>(session_keys::CSRF_TOKEN).await? {
        return Ok(token);
    }

    let token = generate_token();
    session.insert(session_keys::CSRF_TOKEN, &token).await?;
    Ok(token)
}

/// Check a submitted token against the session's.
///
/// # Errors
///
/// Returns `AppError::Forbidden` on a missing or mismatched token.
pub async fn verify_csrf(session: &Session, submitted: &str) -> Result<(), AppError> {
    let expected = session.get::<String>(session_keys::CSRF_TOKEN).await?;

    match expected {
        Some(expected) if constant_time_eq(expected.as_bytes(), submitted.as_bytes()) => Ok(()),
        _ => {
            tracing::warn!("CSRF token mismatch");
            Err(AppError::Forbidden("invalid form token".to_string()))
        }
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_tokens_are_random() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 22);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }

    #[tokio::test]
    async fn test_token_is_stable_per_session() {
        let session = session();
        let first = csrf_token(&session).await.unwrap_or_default();
        let second = csrf_token(&session).await.unwrap_or_default();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_verify() {
        let session = session();
        let token = csrf_token(&session).await.unwrap_or_default();

        assert!(verify_csrf(&session, &token).await.is_ok());
        assert!(matches!(
            verify_csrf(&session, "forged").await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_without_token_in_session() {
        let session = session();
        assert!(verify_csrf(&session, "").await.is_err());
    }
}
