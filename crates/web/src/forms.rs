//! Submitted forms and their validation.
//!
//! Every field is `#[serde(default)]` so a missing input reaches validation
//! (and is reported next to the field) instead of failing extraction.
//! Validation never touches the store or the catalog API.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use cafe_catalog_core::Email;

use crate::models::{Amenity, NewCafe};

const REQUIRED: &str = "This field is required.";
const INVALID_URL: &str = "Enter a full http:// or https:// URL.";
const INVALID_CHOICE: &str = "Choose Yes or No.";

/// Per-field validation messages.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED);
    }
}

fn require_url(errors: &mut FieldErrors, field: &'static str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return;
    }

    let valid = Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https")
            && url.host_str().is_some_and(|host| host.contains('.'))
    });
    if !valid {
        errors.add(field, INVALID_URL);
    }
}

fn require_amenity(errors: &mut FieldErrors, field: &'static str, value: &str) -> Amenity {
    Amenity::from_form(value.trim()).unwrap_or_else(|| {
        errors.add(field, INVALID_CHOICE);
        Amenity::default()
    })
}

// =============================================================================
// Cafe forms
// =============================================================================

/// Add-cafe form.
///
/// Input names follow the page's form; [`AddCafeForm::validate`] maps them to
/// the catalog API's field names. The amenity selects are kept as submitted
/// so an unexpected value is reported next to its field.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCafeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub map_url: String,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub seats: String,
    #[serde(default)]
    pub coffee_price: String,
    #[serde(default)]
    pub toilet: String,
    #[serde(default)]
    pub wifi: String,
    #[serde(default)]
    pub sockets: String,
    #[serde(default)]
    pub calls: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl Default for AddCafeForm {
    /// Blank form; the price starts with a currency sign to type after.
    fn default() -> Self {
        Self {
            name: String::new(),
            map_url: String::new(),
            img_url: String::new(),
            location: String::new(),
            seats: String::new(),
            coffee_price: "$".to_string(),
            toilet: Amenity::Yes.as_str().to_string(),
            wifi: Amenity::Yes.as_str().to_string(),
            sockets: Amenity::Yes.as_str().to_string(),
            calls: Amenity::Yes.as_str().to_string(),
            csrf_token: String::new(),
        }
    }
}

impl AddCafeForm {
    /// Check the submission and build the API payload.
    ///
    /// # Errors
    ///
    /// Returns the messages for every field that failed.
    pub fn validate(&self) -> Result<NewCafe, FieldErrors> {
        let mut errors = FieldErrors::new();

        require(&mut errors, "name", &self.name);
        require_url(&mut errors, "map_url", &self.map_url);
        require_url(&mut errors, "img_url", &self.img_url);
        require(&mut errors, "location", &self.location);
        require(&mut errors, "seats", &self.seats);
        let has_toilet = require_amenity(&mut errors, "toilet", &self.toilet);
        let has_wifi = require_amenity(&mut errors, "wifi", &self.wifi);
        let has_sockets = require_amenity(&mut errors, "sockets", &self.sockets);
        let can_take_calls = require_amenity(&mut errors, "calls", &self.calls);
        require(&mut errors, "coffee_price", &self.coffee_price);

        errors.into_result(|| NewCafe {
            name: self.name.trim().to_string(),
            map_url: self.map_url.trim().to_string(),
            img_url: self.img_url.trim().to_string(),
            location: self.location.trim().to_string(),
            seats: self.seats.trim().to_string(),
            has_toilet,
            has_wifi,
            has_sockets,
            can_take_calls,
            coffee_price: self.coffee_price.trim().to_string(),
        })
    }
}

/// Update-price form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePriceForm {
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl UpdatePriceForm {
    /// # Errors
    ///
    /// Returns a `price` error when the price is blank.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "price", &self.price);
        errors.into_result(|| self.price.trim().to_string())
    }
}

// =============================================================================
// Account forms
// =============================================================================

/// Email + password, shared by the register and login pages.
#[derive(Clone, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl std::fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CredentialsForm {
    /// # Errors
    ///
    /// Returns `email` and/or `password` errors.
    pub fn validate(&self) -> Result<(Email, String), FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = if self.email.trim().is_empty() {
            errors.add("email", REQUIRED);
            None
        } else {
            match Email::parse(&self.email) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors.add("email", "Invalid email address.");
                    None
                }
            }
        };

        // Passwords are taken verbatim; only emptiness is rejected.
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }

        match email {
            Some(email) if errors.is_empty() => Ok((email, self.password.clone())),
            _ => Err(errors),
        }
    }

    /// The same form with the password cleared, for redisplay.
    #[must_use]
    pub fn without_password(&self) -> Self {
        Self {
            email: self.email.clone(),
            password: String::new(),
            csrf_token: String::new(),
        }
    }
}
