//! Database migration command.
//!
//! ```bash
//! lovosis-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/site/migrations/` and are embedded at build time.

use thiserror::Error;
use tracing::info;

use lovosis_site::db;

use super::{MissingEnvVar, database_url};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVar),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply all pending site migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let url = database_url()?;

    info!("Connecting to site database...");
    let pool = db::create_pool(&url).await?;

    info!("Running site migrations...");
    db::migrate(&pool).await?;

    info!("Site migrations complete!");
    Ok(())
}
