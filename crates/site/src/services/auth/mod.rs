//! Admin authentication.
//!
//! Admin endpoints accept a single kind of credential: an HS256 JWT signed
//! with `SITE_JWT_SECRET`. Tokens are minted by `lovosis-cli admin token`
//! and presented either as the `token` cookie or as a bearer token.
//!
//! # Claims
//!
//! ```json
//! { "sub": "ops@lovosis.in", "iss": "lovosis-site", "iat": 1767225600, "exp": 1767254400 }
//! ```

mod error;

pub use error::AuthError;

use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Cookie carrying the admin token.
pub const TOKEN_COOKIE: &str = "token";

/// Issuer written into and required from every token.
pub const TOKEN_ISSUER: &str = "lovosis-site";

/// Clock skew tolerated when checking `exp`, in seconds.
const LEEWAY_SECS: u64 = 60;

/// Claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Who the token was issued to.
    pub sub: String,
    pub iss: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiry (Unix timestamp).
    pub exp: i64,
}

/// Signs and verifies admin tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from the shared HMAC secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = LEEWAY_SECS;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Mint a token for `subject`, valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if encoding fails.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: subject.to_owned(),
            iss: TOKEN_ISSUER.to_owned(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for bad signatures, expired tokens,
    /// wrong issuer or malformed input.
    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        decode::<AdminClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "admin token rejected");
                AuthError::InvalidToken
            })
    }

    /// Pull the token out of a request and verify it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` when no token is present and
    /// `AuthError::InvalidToken` when verification fails.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AdminClaims, AuthError> {
        let token = token_from_headers(headers).ok_or(AuthError::MissingToken)?;
        self.verify(&token)
    }
}

/// Find the admin token: the `token` cookie first, then `Authorization: Bearer`.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(cookie::Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned)
    })
}
