//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while reading, verifying or minting admin tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token in the `token` cookie or `Authorization` header.
    #[error("missing token")]
    MissingToken,

    /// Token failed signature, expiry or claim validation.
    #[error("invalid token")]
    InvalidToken,

    /// Signing a new token failed.
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Whether the caller is at fault (401) rather than the server (500).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingToken | Self::InvalidToken)
    }

    /// Fixed message returned to clients.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Unauthorized",
            Self::InvalidToken => "Invalid token",
            Self::Signing(_) => "Internal server error",
        }
    }
}
