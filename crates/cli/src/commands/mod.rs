pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Read the database URL the same way the site does.
pub fn database_url() -> Result<SecretString, MissingEnvVar> {
    std::env::var("SITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MissingEnvVar("SITE_DATABASE_URL"))
}

/// A required environment variable is not set.
#[derive(Debug, thiserror::Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVar(pub &'static str);
