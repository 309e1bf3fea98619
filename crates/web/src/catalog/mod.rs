//! Remote cafe catalog API client.
//!
//! # Architecture
//!
//! - The remote API is the source of truth - NO local copy, direct calls only
//! - One HTTP request per operation, no retries, no caching, no timeout
//! - Every request carries the shared-secret header
//!
//! # Endpoints
//!
//! ```text
//! GET    /all                    - list cafes
//! POST   /add                    - create (form-encoded)
//! PATCH  /patch/{id}/{price}     - update coffee price
//! DELETE /delete/{id}            - remove
//! ```

mod client;

pub use client::{API_KEY_HEADER, CatalogClient};

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The shared secret cannot be sent as a header value.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
}

impl CatalogError {
    /// Upstream status code, when the API answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
