//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::Uri, response::IntoResponse};
use tracing::instrument;

use super::layout::Layout;
use crate::db::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::NavbarCategory;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    /// Navbar categories shown as image tiles.
    pub featured: Vec<NavbarCategory>,
}

/// Display the home page.
#[instrument(skip(state, nonce))]
pub async fn home(
    State(state): State<AppState>,
    nonce: CspNonce,
    uri: Uri,
) -> Result<impl IntoResponse> {
    let layout = Layout::load(&state, uri.path(), &nonce).await?.titled(
        "Lovosis Technologies",
        "Laboratory, educational and training equipment manufacturer.",
    );

    let featured = CatalogRepository::new(state.pool())
        .navbar_categories()
        .await?
        .into_iter()
        .filter(|n| n.image.is_some())
        .collect();

    Ok(HomeTemplate { layout, featured })
}
