//! Uploaded file storage.

use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryError;
use crate::models::StoredFile;

/// Repository for uploaded files.
pub struct FileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FileRepository<'a> {
    /// Create a new file repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a file under a fresh random id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn store(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<Uuid, RepositoryError> {
        let id = Uuid::new_v4();
        let size = i64::try_from(data.len())
            .map_err(|_| RepositoryError::DataCorruption("file too large".to_owned()))?;

        sqlx::query(
            r"
            INSERT INTO site.stored_file (id, filename, content_type, size_bytes, data)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(id)
        .bind(filename)
        .bind(content_type)
        .bind(size)
        .bind(data)
        .execute(self.pool)
        .await?;

        Ok(id)
    }

    /// Fetch a file with its bytes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: Uuid) -> Result<Option<StoredFile>, RepositoryError> {
        let row = sqlx::query_as::<_, StoredFile>(
            r"
            SELECT id, filename, content_type, size_bytes, data, created_at
            FROM site.stored_file
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}
