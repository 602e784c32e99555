//! HTTP route handlers for the catalog site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /about                   - About (markdown)
//! GET  /services                - Services (markdown)
//! GET  /certificates            - Certificates (markdown)
//! GET  /contact                 - Contact (markdown + form)
//!
//! # Catalog
//! GET  /products                - All navbar categories
//! GET  /products/{navbar}/...   - Catalog pages, see `products`
//!
//! # JSON API
//! /api/...                      - See `api`
//!
//! Anything else renders the 404 page.
//! ```

pub mod api;
pub mod home;
pub mod layout;
pub mod pages;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;
use layout::Layout;

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
}

/// Render the 404 page.
///
/// Falls back to a layout without the menu if the navigation cannot be
/// loaded, so a broken database still yields a 404 rather than a 500.
pub async fn not_found_page(state: &AppState, nonce: &CspNonce, uri: &Uri) -> Response {
    let layout = match Layout::load(state, uri.path(), nonce).await {
        Ok(layout) => layout,
        Err(e) => {
            tracing::error!(error = %e, "failed to load navigation for 404 page");
            Layout::bare(state, uri.path(), nonce)
        }
    };

    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            layout: layout.titled("Page not found", ""),
        },
    )
        .into_response()
}

/// Fallback handler for unmatched routes.
async fn fallback(State(state): State<AppState>, nonce: CspNonce, uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "no route matched");
    not_found_page(&state, &nonce, &uri).await
}

/// Create all routes for the site.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(pages::router())
        .nest("/products", products::router())
        .nest("/api", api::router(max_upload_bytes))
        .fallback(fallback)
}
