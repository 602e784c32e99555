//! Review repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lovosis_core::{Email, Rating, ReviewId, ReviewItemType};

use super::RepositoryError;
use crate::models::Review;

/// Parameters for creating a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub item_id: i32,
    pub item_type: ReviewItemType,
    pub name: String,
    pub email: Email,
    pub rating: Rating,
    pub comment: String,
}

/// Internal row type; `item_type` is stored as text.
#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    item_id: i32,
    item_type: String,
    name: String,
    email: Email,
    rating: Rating,
    comment: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let item_type = row.item_type.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("review {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            item_id: row.item_id,
            item_type,
            name: row.name,
            email: row.email,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        })
    }
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews for an item, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored item type is unknown.
    pub async fn for_item(
        &self,
        item_id: i32,
        item_type: ReviewItemType,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT id, item_id, item_type, name, email, rating, comment, created_at
            FROM site.review
            WHERE item_id = $1 AND item_type = $2
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(item_id)
        .bind(item_type.to_string())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    /// Insert a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, review: &NewReview) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            INSERT INTO site.review (item_id, item_type, name, email, rating, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, item_id, item_type, name, email, rating, comment, created_at
            ",
        )
        .bind(review.item_id)
        .bind(review.item_type.to_string())
        .bind(&review.name)
        .bind(&review.email)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(self.pool)
        .await?;

        Review::try_from(row)
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no review has this id.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM site.review WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
