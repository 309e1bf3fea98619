//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET       /                  - Home page
//! GET       /health            - Liveness check
//! GET       /health/ready      - Readiness check (user store)
//!
//! # Catalog
//! GET       /cafes             - Cafe listing (remote API)
//! GET|POST  /add               - Add-cafe form / submit        (requires auth)
//! GET|POST  /update/{id}       - Update-price form / submit    (requires auth)
//! GET       /delete/{id}       - Delete a cafe                 (requires auth)
//!
//! # Auth
//! GET|POST  /register          - Registration page / action
//! GET|POST  /login             - Login page / action
//! GET|POST  /logout            - Logout action
//! ```

pub mod auth;
pub mod cafes;
pub mod health;
pub mod home;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the account routes.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
}

/// Create the cafe catalog routes.
pub fn cafe_routes() -> Router<AppState> {
    Router::new()
        .route("/cafes", get(cafes::index))
        .route("/add", get(cafes::add_page).post(cafes::add))
        .route("/update/{id}", get(cafes::update_page).post(cafes::update))
        .route("/delete/{id}", get(cafes::delete))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(cafe_routes())
        .merge(auth_routes())
}
