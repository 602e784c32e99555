//! Admin authentication extractor.
//!
//! Provides an extractor that gates admin route handlers on a valid token.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::AdminClaims;
use crate::state::AppState;

/// Extractor that requires a valid admin token.
///
/// Missing tokens are rejected with `401 {"error":"Unauthorized"}` and bad
/// ones with `401 {"error":"Invalid token"}`.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_subscribers(
///     RequireAdmin(admin): RequireAdmin,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<NewsletterSubscriber>>> {
///     tracing::info!(admin = %admin.sub, "listing subscribers");
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AdminClaims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = state.tokens().authenticate(&parts.headers)?;

        tracing::debug!(admin = %claims.sub, "admin request authenticated");
        set_sentry_user(&claims.sub);

        Ok(Self(claims))
    }
}
