//! Cafe catalog route handlers.
//!
//! Listing is public; add, update and delete need a logged-in user. Any
//! logged-in user may change any cafe.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use cafe_catalog_core::CafeId;

use crate::error::Result;
use crate::forms::{AddCafeForm, FieldErrors, UpdatePriceForm};
use crate::middleware::{OptionalAuth, RequireAuth, csrf_token, verify_csrf};
use crate::models::Cafe;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Cafe listing template.
#[derive(Template, WebTemplate)]
#[template(path = "cafes.html")]
pub struct CafesTemplate {
    pub logged_in: bool,
    pub cafes: Vec<Cafe>,
}

/// Add-cafe form template.
#[derive(Template, WebTemplate)]
#[template(path = "add.html")]
pub struct AddTemplate {
    pub logged_in: bool,
    pub csrf_token: String,
    pub form: AddCafeForm,
    pub errors: FieldErrors,
}

/// Update-price form template.
#[derive(Template, WebTemplate)]
#[template(path = "update.html")]
pub struct UpdateTemplate {
    pub logged_in: bool,
    pub csrf_token: String,
    pub id: CafeId,
    pub price: String,
    pub errors: FieldErrors,
}

// =============================================================================
// Listing
// =============================================================================

/// List every cafe from the catalog API.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, auth: OptionalAuth) -> Result<impl IntoResponse> {
    let cafes = state.catalog().list_cafes().await?;

    Ok(CafesTemplate {
        logged_in: auth.is_authenticated(),
        cafes,
    })
}

// =============================================================================
// Add
// =============================================================================

/// Display the add-cafe form.
pub async fn add_page(_auth: RequireAuth, session: Session) -> Result<impl IntoResponse> {
    Ok(AddTemplate {
        logged_in: true,
        csrf_token: csrf_token(&session).await?,
        form: AddCafeForm::default(),
        errors: FieldErrors::new(),
    })
}

/// Handle add-cafe form submission.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddCafeForm>,
) -> Result<Response> {
    verify_csrf(&session, &form.csrf_token).await?;

    let cafe = match form.validate() {
        Ok(cafe) => cafe,
        Err(errors) => {
            return Ok(AddTemplate {
                logged_in: true,
                csrf_token: csrf_token(&session).await?,
                form,
                errors,
            }
            .into_response());
        }
    };

    state.catalog().add_cafe(&cafe).await?;

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Update price
// =============================================================================

/// Display the update-price form.
pub async fn update_page(
    _auth: RequireAuth,
    session: Session,
    Path(id): Path<CafeId>,
) -> Result<impl IntoResponse> {
    Ok(UpdateTemplate {
        logged_in: true,
        csrf_token: csrf_token(&session).await?,
        id,
        price: String::new(),
        errors: FieldErrors::new(),
    })
}

/// Handle update-price form submission.
#[instrument(skip_all, fields(user_id = %user.id, cafe_id = %id))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CafeId>,
    Form(form): Form<UpdatePriceForm>,
) -> Result<Response> {
    verify_csrf(&session, &form.csrf_token).await?;

    let price = match form.validate() {
        Ok(price) => price,
        Err(errors) => {
            return Ok(UpdateTemplate {
                logged_in: true,
                csrf_token: csrf_token(&session).await?,
                id,
                price: form.price,
                errors,
            }
            .into_response());
        }
    };

    state.catalog().update_price(id, &price).await?;

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Delete
// =============================================================================

/// Delete a cafe.
#[instrument(skip_all, fields(user_id = %user.id, cafe_id = %id))]
pub async fn delete(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<CafeId>,
) -> Result<Redirect> {
    state.catalog().delete_cafe(id).await?;

    Ok(Redirect::to("/"))
}
