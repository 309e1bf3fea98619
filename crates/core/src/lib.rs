//! Cafe Catalog Core - Shared types library.
//!
//! This crate provides the small set of validated types used across the
//! cafe catalog workspace:
//! - `web` - Server-rendered site (auth + catalog pages)
//! - `integration-tests` - End-to-end tests against the site
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and usable from any crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and email addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
