//! Session middleware configuration.
//!
//! Sessions live server-side (Postgres in production, memory in tests); the
//! browser only holds a signed cookie with the session id.

use sha2::{Digest, Sha512};
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cafe_session";

/// Create the session layer over any session store.
///
/// The cookie is a browser-session cookie: closing the browser ends the
/// session, matching the lifetime of a login.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &AppConfig) -> SessionManagerLayer<S, SignedCookie>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(config.is_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config.session_secret_bytes()))
}

/// Derive the 64-byte cookie signing key from the configured secret.
fn signing_key(secret: &[u8]) -> Key {
    let digest = Sha512::digest(secret);
    Key::from(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_is_deterministic() {
        let a = signing_key(b"0123456789abcdef0123456789abcdef");
        let b = signing_key(b"0123456789abcdef0123456789abcdef");
        let c = signing_key(b"fedcba9876543210fedcba9876543210");

        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
