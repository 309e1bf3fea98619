//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::middleware::OptionalAuth;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub logged_in: bool,
    pub email: Option<String>,
}

/// Display the home page.
pub async fn home(auth: OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        logged_in: auth.is_authenticated(),
        email: auth.0.map(|user| user.email.into_inner()),
    }
}
