//! Integration tests for the Lovosis site.
//!
//! # Running Tests
//!
//! ```bash
//! # Start Postgres, apply migrations and run the site
//! lovosis-cli migrate
//! cargo run -p lovosis-site
//!
//! # Run the ignored integration tests against it
//! cargo test -p lovosis-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_BASE_URL` - Where the site is listening (default: `http://localhost:3000`)
//! - `SITE_JWT_SECRET` - Must match the running site for admin tests

use chrono::Duration;
use reqwest::Client;
use secrecy::SecretString;

use lovosis_site::services::auth::TokenService;

/// Base URL of the running site.
#[must_use]
pub fn base_url() -> String {
    std::env::var("SITE_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Absolute URL for `path` on the running site.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// A plain HTTP client without redirects, so status codes are observed as sent.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Mint an admin token with the secret the running site uses.
///
/// Returns `None` when `SITE_JWT_SECRET` is not set, so admin tests can skip.
#[must_use]
pub fn admin_token() -> Option<String> {
    let secret = std::env::var("SITE_JWT_SECRET").ok()?;
    TokenService::new(&SecretString::from(secret))
        .issue("integration-tests", Duration::minutes(5))
        .ok()
}
