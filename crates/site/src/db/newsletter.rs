//! Newsletter subscriber repository.

use sqlx::PgPool;

use lovosis_core::{Email, SubscriberId};

use super::RepositoryError;
use crate::models::NewsletterSubscriber;

/// What a subscribe call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscription {
    /// New subscriber row.
    Created(NewsletterSubscriber),
    /// Address was already active; nothing changed.
    AlreadySubscribed(NewsletterSubscriber),
    /// Previously unsubscribed address was switched back on.
    Reactivated(NewsletterSubscriber),
}

impl Subscription {
    /// The subscriber after the operation.
    #[must_use]
    pub const fn subscriber(&self) -> &NewsletterSubscriber {
        match self {
            Self::Created(s) | Self::AlreadySubscribed(s) | Self::Reactivated(s) => s,
        }
    }
}

/// Repository for newsletter subscribers.
pub struct NewsletterRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NewsletterRepository<'a> {
    /// Create a new newsletter repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a subscriber by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<NewsletterSubscriber>, RepositoryError> {
        let row = sqlx::query_as::<_, NewsletterSubscriber>(
            r"
            SELECT id, email, is_active, subscribed_at, unsubscribed_at
            FROM site.newsletter_subscriber
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Subscribe an address. Idempotent for active subscribers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn subscribe(&self, email: &Email) -> Result<Subscription, RepositoryError> {
        match self.get_by_email(email).await? {
            Some(existing) if existing.is_active => {
                return Ok(Subscription::AlreadySubscribed(existing));
            }
            Some(existing) => {
                let row = sqlx::query_as::<_, NewsletterSubscriber>(
                    r"
                    UPDATE site.newsletter_subscriber
                    SET is_active = TRUE, subscribed_at = NOW(), unsubscribed_at = NULL
                    WHERE id = $1
                    RETURNING id, email, is_active, subscribed_at, unsubscribed_at
                    ",
                )
                .bind(existing.id)
                .fetch_one(self.pool)
                .await?;
                return Ok(Subscription::Reactivated(row));
            }
            None => {}
        }

        let inserted = sqlx::query_as::<_, NewsletterSubscriber>(
            r"
            INSERT INTO site.newsletter_subscriber (email)
            VALUES ($1)
            RETURNING id, email, is_active, subscribed_at, unsubscribed_at
            ",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "subscriber"));

        match inserted {
            Ok(row) => Ok(Subscription::Created(row)),
            // Lost a race with a concurrent subscribe for the same address
            Err(RepositoryError::Conflict(_)) => self
                .get_by_email(email)
                .await?
                .map(Subscription::AlreadySubscribed)
                .ok_or(RepositoryError::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Deactivate an address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address never subscribed.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn unsubscribe(&self, email: &Email) -> Result<NewsletterSubscriber, RepositoryError> {
        sqlx::query_as::<_, NewsletterSubscriber>(
            r"
            UPDATE site.newsletter_subscriber
            SET is_active = FALSE,
                unsubscribed_at = COALESCE(unsubscribed_at, NOW())
            WHERE email = $1
            RETURNING id, email, is_active, subscribed_at, unsubscribed_at
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// All subscribers, most recent sign-up first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<NewsletterSubscriber>, RepositoryError> {
        let rows = sqlx::query_as::<_, NewsletterSubscriber>(
            r"
            SELECT id, email, is_active, subscribed_at, unsubscribed_at
            FROM site.newsletter_subscriber
            ORDER BY subscribed_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Remove a subscriber entirely.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no subscriber has this id.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: SubscriberId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM site.newsletter_subscriber WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
