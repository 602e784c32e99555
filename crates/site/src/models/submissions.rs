//! Visitor submissions: reviews, leads, subscribers and uploads.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use lovosis_core::{
    CatalogRequestId, CatalogRequestStatus, ContactMessageId, Email, Rating, ReviewId,
    ReviewItemType, SubscriberId,
};

/// A product review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub item_id: i32,
    pub item_type: ReviewItemType,
    pub name: String,
    /// Never shown publicly.
    #[serde(skip_serializing)]
    pub email: Email,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A request to receive a product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRequest {
    pub id: CatalogRequestId,
    pub full_name: String,
    pub company_name: Option<String>,
    pub email: Email,
    pub phone: String,
    pub product_name: String,
    pub catalog_images: Vec<String>,
    pub status: CatalogRequestStatus,
    pub created_at: DateTime<Utc>,
}

/// A newsletter subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscriber {
    pub id: SubscriberId,
    pub email: Email,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

/// A contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// An uploaded file and its bytes.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredFile {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// Public URL for a stored file id.
#[must_use]
pub fn file_url(id: Uuid) -> String {
    format!("/api/files/{id}")
}
