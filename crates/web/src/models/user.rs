//! User domain type.

use cafe_catalog_core::{Email, UserId};

/// A local account.
///
/// Only ever created (registration) and read (login, session reload).
#[derive(Clone)]
pub struct User {
    /// Generated primary key.
    pub id: UserId,
    /// Normalized, unique email address.
    pub email: Email,
    /// Argon2id PHC string; carries its own random salt.
    pub password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_hash() {
        let user = User {
            id: UserId::new(1),
            email: Email::parse("a@b.co").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        };

        let output = format!("{user:?}");
        assert!(output.contains("a@b.co"));
        assert!(!output.contains("argon2id"));
    }
}
