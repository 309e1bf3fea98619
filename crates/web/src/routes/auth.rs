//! Account route handlers: registration, login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::forms::{CredentialsForm, FieldErrors};
use crate::middleware::{OptionalAuth, csrf_token, log_in, log_out, verify_csrf};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub logged_in: bool,
    pub csrf_token: String,
    pub form: CredentialsForm,
    pub errors: FieldErrors,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub logged_in: bool,
    pub csrf_token: String,
    pub form: CredentialsForm,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

/// Map an `?error=` code to the message shown above the login form.
fn login_error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        _ => "Please log in to continue.",
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
pub async fn register_page(auth: OptionalAuth, session: Session) -> Result<impl IntoResponse> {
    Ok(RegisterTemplate {
        logged_in: auth.is_authenticated(),
        csrf_token: csrf_token(&session).await?,
        form: CredentialsForm::default(),
        errors: FieldErrors::new(),
    })
}

/// Handle registration form submission.
///
/// A new account is logged in straight away. An email that is already
/// registered redisplays the form with a conflict message.
#[instrument(skip_all, fields(email = %form.email.trim()))]
pub async fn register(
    State(state): State<AppState>,
    auth: OptionalAuth,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    verify_csrf(&session, &form.csrf_token).await?;

    let (email, password) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(RegisterTemplate {
                logged_in: auth.is_authenticated(),
                csrf_token: csrf_token(&session).await?,
                form: form.without_password(),
                errors,
            }
            .into_response());
        }
    };

    let user = match AuthService::new(state.users()).register(&email, &password).await {
        Ok(user) => user,
        Err(AuthError::UserAlreadyExists) => {
            tracing::info!("registration for existing email");
            let mut errors = FieldErrors::new();
            errors.add("email", "An account with this email already exists.");

            let page = RegisterTemplate {
                logged_in: auth.is_authenticated(),
                csrf_token: csrf_token(&session).await?,
                form: form.without_password(),
                errors,
            };
            return Ok((StatusCode::CONFLICT, page).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    log_in(&session, &user).await?;

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Login
// =============================================================================

/// Display the login page.
pub async fn login_page(
    auth: OptionalAuth,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    Ok(LoginTemplate {
        logged_in: auth.is_authenticated(),
        csrf_token: csrf_token(&session).await?,
        form: CredentialsForm::default(),
        errors: FieldErrors::new(),
        error: query
            .error
            .as_deref()
            .map(|code| login_error_message(code).to_string()),
    })
}

/// Handle login form submission.
#[instrument(skip_all, fields(email = %form.email.trim()))]
pub async fn login(
    State(state): State<AppState>,
    auth: OptionalAuth,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    verify_csrf(&session, &form.csrf_token).await?;

    let (email, password) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(LoginTemplate {
                logged_in: auth.is_authenticated(),
                csrf_token: csrf_token(&session).await?,
                form: form.without_password(),
                errors,
                error: None,
            }
            .into_response());
        }
    };

    match AuthService::new(state.users()).login(&email, &password).await {
        Ok(user) => {
            log_in(&session, &user).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("login failed");
            Ok(Redirect::to("/login?error=credentials").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and go home.
pub async fn logout(session: Session) -> Result<Redirect> {
    log_out(&session).await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_messages() {
        assert_eq!(login_error_message("credentials"), "Invalid email or password.");
        assert_eq!(login_error_message("whatever"), "Please log in to continue.");
    }
}
