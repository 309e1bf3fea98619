//! Authentication extractors and session helpers.
//!
//! A request is either Anonymous (no principal in its session) or
//! Authenticated (a `CurrentUser` whose account still exists). Handlers never
//! read the principal from anywhere but their own request's session.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{CurrentUser, User, session_keys};
use crate::state::AppState;

/// Where anonymous visitors of protected pages are sent.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires an authenticated user.
///
/// If nobody is logged in, the request is answered with a redirect to the
/// login page and the handler never runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Why [`RequireAuth`] refused a request.
#[derive(Debug)]
pub enum AuthRejection {
    /// No principal (or a stale one): go log in.
    RedirectToLogin,
    /// The session or user store failed.
    Failed(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| {
                AuthRejection::Failed(AppError::Internal("session layer missing".to_string()))
            })?;

        let current: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .map_err(|e| AuthRejection::Failed(e.into()))?
            .ok_or(AuthRejection::RedirectToLogin)?;

        // Re-load the account so a deleted user's session stops working.
        let user = state
            .users()
            .find_by_id(current.id)
            .await
            .map_err(|e| AuthRejection::Failed(e.into()))?;

        if user.is_none() {
            tracing::info!(user_id = %current.id, "dropping session of missing user");
            log_out(&session)
                .await
                .map_err(|e| AuthRejection::Failed(e.into()))?;
            return Err(AuthRejection::RedirectToLogin);
        }

        Ok(Self(current))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects; pages use it to decide what the
/// navigation shows.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl OptionalAuth {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Make `user` the principal of this session (Anonymous -> Authenticated).
///
/// The session id is rotated first so an id planted before login is useless
/// afterwards.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn log_in(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::CURRENT_USER, CurrentUser::from(user))
        .await?;
    set_sentry_user(&user.id);
    Ok(())
}

/// Drop the whole session (Authenticated -> Anonymous).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn log_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await?;
    clear_sentry_user();
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use cafe_catalog_core::{Email, UserId};
    use tower_sessions::MemoryStore;

    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(3),
            email: Email::parse("owner@cafe.org").unwrap(),
            password_hash: "irrelevant".to_string(),
        }
    }

    #[tokio::test]
    async fn test_log_in_then_out() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        log_in(&session, &user()).await.unwrap();
        let stored: Option<CurrentUser> = session.get(session_keys::CURRENT_USER).await.unwrap();
        assert_eq!(stored.map(|u| u.id), Some(UserId::new(3)));

        log_out(&session).await.unwrap();
        let stored: Option<CurrentUser> = session.get(session_keys::CURRENT_USER).await.unwrap();
        assert!(stored.is_none());
    }

    #[test]
    fn test_rejection_redirects_to_login() {
        let response = AuthRejection::RedirectToLogin.into_response();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get("location").unwrap(), LOGIN_PATH);
    }
}
