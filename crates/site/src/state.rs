//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentStore};
use crate::services::auth::TokenService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    content: ContentStore,
    tokens: TokenService,
}

impl AppState {
    /// Create a new application state, loading page content from
    /// `config.content_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read.
    pub fn new(config: SiteConfig, pool: PgPool) -> Result<Self, ContentError> {
        let content = ContentStore::load(&config.content_dir)?;
        tracing::info!(pages = content.len(), "Content loaded");

        Ok(Self::with_content(config, pool, content))
    }

    /// Create state from already-loaded content.
    #[must_use]
    pub fn with_content(config: SiteConfig, pool: PgPool, content: ContentStore) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                content,
                tokens,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the markdown page store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Get a reference to the admin token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}
