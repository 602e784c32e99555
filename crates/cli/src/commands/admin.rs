//! Admin token minting.
//!
//! ```bash
//! lovosis-cli admin token --subject ops@lovosis.in --hours 12
//! ```
//!
//! The token is written to stdout so it can be piped into a header:
//!
//! ```bash
//! curl -H "Authorization: Bearer $(lovosis-cli admin token -s ops)" \
//!     https://lovosis.in/api/admin/newsletter
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_JWT_SECRET` - Signing secret shared with the running site

use chrono::Duration;
use secrecy::SecretString;
use thiserror::Error;

use lovosis_site::services::auth::{AuthError, TokenService};

/// Token lifetime when `--hours` is not given.
pub const DEFAULT_TTL_HOURS: i64 = 8;

/// Upper bound on `--hours`, one year.
const MAX_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Subject must not be empty")]
    EmptySubject,

    #[error("Hours must be between 1 and {MAX_TTL_HOURS} (got {0})")]
    InvalidTtl(i64),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Mint an admin token for `subject` that expires after `hours`.
///
/// # Errors
///
/// Returns an error if `SITE_JWT_SECRET` is unset, the arguments are out of
/// range, or signing fails.
pub fn mint_token(subject: &str, hours: i64) -> Result<String, AdminError> {
    dotenvy::dotenv().ok();

    let secret = std::env::var("SITE_JWT_SECRET")
        .map(SecretString::from)
        .map_err(|_| AdminError::MissingEnvVar("SITE_JWT_SECRET"))?;

    let token = sign(&TokenService::new(&secret), subject, hours)?;
    tracing::info!(subject, hours, "Issued admin token");
    Ok(token)
}

fn sign(tokens: &TokenService, subject: &str, hours: i64) -> Result<String, AdminError> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(AdminError::EmptySubject);
    }
    if !(1..=MAX_TTL_HOURS).contains(&hours) {
        return Err(AdminError::InvalidTtl(hours));
    }
    Ok(tokens.issue(subject, Duration::hours(hours))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("k7#Qp2!vX9@mL4$wR8^tY1&zB6*nC3%d"))
    }

    #[test]
    fn test_signed_token_verifies() {
        let tokens = service();
        let token = sign(&tokens, " ops@lovosis.in ", 2).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "ops@lovosis.in");
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn test_rejects_blank_subject() {
        assert!(matches!(
            sign(&service(), "   ", 1),
            Err(AdminError::EmptySubject)
        ));
    }

    #[test]
    fn test_rejects_out_of_range_hours() {
        assert!(matches!(sign(&service(), "ops", 0), Err(AdminError::InvalidTtl(0))));
        assert!(matches!(
            sign(&service(), "ops", MAX_TTL_HOURS + 1),
            Err(AdminError::InvalidTtl(_))
        ));
    }
}
