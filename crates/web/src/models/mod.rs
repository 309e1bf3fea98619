//! Domain models for the site.
//!
//! - [`user`] - Locally stored accounts
//! - [`session`] - Identity kept in the session cookie's server-side record
//! - [`cafe`] - Cafe records as exchanged with the remote catalog API

pub mod cafe;
pub mod session;
pub mod user;

pub use cafe::{Amenity, Cafe, NewCafe};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
