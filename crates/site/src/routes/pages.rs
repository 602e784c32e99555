//! Static content page route handlers.
//!
//! Serves the markdown pages under `content/pages/`: about, services,
//! certificates and contact. The contact page also carries the contact form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use super::layout::Layout;
use super::not_found_page;
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub layout: Layout,
    pub hero_image: Option<String>,
    pub content_html: String,
    pub show_contact_form: bool,
}

/// Serve a content page by slug, or the 404 page when it was not loaded.
async fn serve_content_page(
    state: &AppState,
    nonce: &CspNonce,
    uri: &Uri,
    slug: &str,
) -> Result<Response> {
    let Some(page) = state.content().get_page(slug) else {
        tracing::warn!(slug, "content page not loaded");
        return Ok(not_found_page(state, nonce, uri).await);
    };

    let layout = Layout::load(state, uri.path(), nonce).await?.titled(
        page.meta.title.clone(),
        page.meta.description.clone().unwrap_or_default(),
    );

    Ok(ContentPageTemplate {
        layout,
        hero_image: page.meta.hero_image.clone(),
        content_html: page.content_html.clone(),
        show_contact_form: slug == "contact",
    }
    .into_response())
}

/// Display the About page.
#[instrument(skip(state, nonce))]
pub async fn about(State(state): State<AppState>, nonce: CspNonce, uri: Uri) -> Result<Response> {
    serve_content_page(&state, &nonce, &uri, "about").await
}

/// Display the Services page.
#[instrument(skip(state, nonce))]
pub async fn services(
    State(state): State<AppState>,
    nonce: CspNonce,
    uri: Uri,
) -> Result<Response> {
    serve_content_page(&state, &nonce, &uri, "services").await
}

/// Display the Certificates page.
#[instrument(skip(state, nonce))]
pub async fn certificates(
    State(state): State<AppState>,
    nonce: CspNonce,
    uri: Uri,
) -> Result<Response> {
    serve_content_page(&state, &nonce, &uri, "certificates").await
}

/// Display the Contact page with the contact form.
#[instrument(skip(state, nonce))]
pub async fn contact(
    State(state): State<AppState>,
    nonce: CspNonce,
    uri: Uri,
) -> Result<Response> {
    serve_content_page(&state, &nonce, &uri, "contact").await
}

/// Create the pages routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/services", get(services))
        .route("/certificates", get(certificates))
        .route("/contact", get(contact))
}
