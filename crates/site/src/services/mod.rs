//! Business logic services for the site.
//!
//! # Services
//!
//! - `auth` - Admin token issuing and verification (HS256 JWT)

pub mod auth;
