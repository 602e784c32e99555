//! Lead capture: catalog requests and contact messages.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lovosis_core::{CatalogRequestId, CatalogRequestStatus, Email};

use super::RepositoryError;
use crate::models::{CatalogRequest, ContactMessage};

/// Parameters for creating a catalog request.
#[derive(Debug, Clone)]
pub struct NewCatalogRequest {
    pub full_name: String,
    pub company_name: Option<String>,
    pub email: Email,
    pub phone: String,
    pub product_name: String,
    pub catalog_images: Vec<String>,
}

/// Parameters for creating a contact message.
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

#[derive(sqlx::FromRow)]
struct CatalogRequestRow {
    id: CatalogRequestId,
    full_name: String,
    company_name: Option<String>,
    email: Email,
    phone: String,
    product_name: String,
    catalog_images: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CatalogRequestRow> for CatalogRequest {
    type Error = RepositoryError;

    fn try_from(row: CatalogRequestRow) -> Result<Self, Self::Error> {
        let status: CatalogRequestStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("catalog request {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            full_name: row.full_name,
            company_name: row.company_name,
            email: row.email,
            phone: row.phone,
            product_name: row.product_name,
            catalog_images: row.catalog_images,
            status,
            created_at: row.created_at,
        })
    }
}

/// Repository for lead-capture submissions.
pub struct LeadRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeadRepository<'a> {
    /// Create a new lead repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Catalog requests
    // =========================================================================

    /// Record a catalog request with status `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_catalog_request(
        &self,
        request: &NewCatalogRequest,
    ) -> Result<CatalogRequest, RepositoryError> {
        let row = sqlx::query_as::<_, CatalogRequestRow>(
            r"
            INSERT INTO site.catalog_request
                (full_name, company_name, email, phone, product_name, catalog_images, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, full_name, company_name, email, phone, product_name,
                      catalog_images, status, created_at
            ",
        )
        .bind(&request.full_name)
        .bind(&request.company_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.product_name)
        .bind(&request.catalog_images)
        .bind(CatalogRequestStatus::Pending.to_string())
        .fetch_one(self.pool)
        .await?;

        CatalogRequest::try_from(row)
    }

    /// All catalog requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is unknown.
    pub async fn catalog_requests(&self) -> Result<Vec<CatalogRequest>, RepositoryError> {
        let rows = sqlx::query_as::<_, CatalogRequestRow>(
            r"
            SELECT id, full_name, company_name, email, phone, product_name,
                   catalog_images, status, created_at
            FROM site.catalog_request
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CatalogRequest::try_from).collect()
    }

    // =========================================================================
    // Contact messages
    // =========================================================================

    /// Record a contact form submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactMessage>(
            r"
            INSERT INTO site.contact_message (name, email, phone, subject, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, subject, message, created_at
            ",
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.subject)
        .bind(&message.message)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// All contact messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contact_messages(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactMessage>(
            r"
            SELECT id, name, email, phone, subject, message, created_at
            FROM site.contact_message
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
