//! JSON API.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog (public)
//! GET    /api/navbarcategories          - Navbar categories, insertion order
//! GET    /api/categories                - Categories
//! GET    /api/subcategories             - Subcategories (all depths)
//! GET    /api/navigation                - Nested mega-menu tree
//! GET    /api/products                  - Products, optional id filters
//! GET    /api/products/{slug}           - Product by slug
//! GET    /api/search?q=                 - Name search, max 20
//!
//! # Submissions (public, rate limited)
//! GET    /api/reviews?itemId=&itemType= - Reviews for an item
//! POST   /api/reviews                   - Create review
//! POST   /api/catalog-requests          - Request a product catalog
//! POST   /api/newsletter                - Subscribe
//! POST   /api/newsletter/unsubscribe    - Unsubscribe
//! POST   /api/contact                   - Contact message
//! GET    /api/files/{id}                - Uploaded file
//!
//! # Admin (token required)
//! GET    /api/admin/newsletter          - Subscribers
//! DELETE /api/admin/newsletter?id=      - Delete subscriber
//! DELETE /api/reviews/{id}              - Delete review
//! GET    /api/admin/catalog-requests    - Catalog requests
//! GET    /api/admin/contact             - Contact messages
//! POST   /api/upload                    - Upload a file (multipart `file`)
//! ```

pub mod catalog;
pub mod catalog_requests;
pub mod contact;
pub mod files;
pub mod newsletter;
pub mod reviews;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

use lovosis_core::Email;

use crate::error::AppError;
use crate::middleware::form_rate_limiter;
use crate::state::AppState;

/// Create the `/api` router.
///
/// `max_upload_bytes` caps the multipart body accepted by `/api/upload`.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    let catalog = Router::new()
        .route("/navbarcategories", get(catalog::navbar_categories))
        .route("/categories", get(catalog::categories))
        .route("/subcategories", get(catalog::subcategories))
        .route("/navigation", get(catalog::navigation))
        .route("/products", get(catalog::products))
        .route("/products/{slug}", get(catalog::product))
        .route("/search", get(catalog::search));

    let submissions = Router::new()
        .route("/reviews", post(reviews::create))
        .route("/catalog-requests", post(catalog_requests::create))
        .route("/newsletter", post(newsletter::subscribe))
        .route("/newsletter/unsubscribe", post(newsletter::unsubscribe))
        .route("/contact", post(contact::create))
        .layer(form_rate_limiter());

    let admin = Router::new()
        .route(
            "/admin/newsletter",
            get(newsletter::list).delete(newsletter::delete),
        )
        .route("/admin/catalog-requests", get(catalog_requests::list))
        .route("/admin/contact", get(contact::list))
        .route("/reviews/{id}", delete(reviews::delete))
        .route(
            "/upload",
            post(files::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        );

    Router::new()
        .route("/reviews", get(reviews::list))
        .route("/files/{id}", get(files::download))
        .merge(catalog)
        .merge(submissions)
        .merge(admin)
}

// =============================================================================
// Payload validation
// =============================================================================

/// Trim a required text field, rejecting blank values.
pub(crate) fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Trim an optional text field, treating blank as absent.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse and lowercase an email address.
pub(crate) fn email(value: &str) -> Result<Email, AppError> {
    Email::normalize(value).map_err(|e| {
        tracing::debug!(error = %e, "rejected email");
        AppError::BadRequest("Please enter a valid email address".to_string())
    })
}

/// Minimum number of digits in a phone number.
pub(crate) const MIN_PHONE_DIGITS: usize = 10;

/// Require a phone number with at least [`MIN_PHONE_DIGITS`] digits.
///
/// Formatting characters are allowed and kept as typed.
pub(crate) fn phone(value: &str) -> Result<String, AppError> {
    let value = required("phone", value)?;
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(AppError::BadRequest(
            "Please enter a valid phone number".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Asha ").unwrap(), "Asha");
    }

    #[test]
    fn test_required_rejects_blank() {
        let err = required("name", "   ").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "name is required"));
    }

    #[test]
    fn test_optional_drops_blank() {
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(None), None);
        assert_eq!(optional(Some(" Acme ")).as_deref(), Some("Acme"));
    }

    #[test]
    fn test_email_is_normalized() {
        assert_eq!(email(" Sales@Lovosis.IN ").unwrap().as_str(), "sales@lovosis.in");
        assert!(email("not-an-email").is_err());
        assert!(email("").is_err());
    }

    #[test]
    fn test_phone_counts_digits() {
        assert_eq!(phone("+91 98765-43210").unwrap(), "+91 98765-43210");
        assert!(phone("98765").is_err());
        assert!(phone("call me maybe").is_err());
        assert!(phone("").is_err());
    }
}
