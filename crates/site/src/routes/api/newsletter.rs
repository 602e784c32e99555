//! Newsletter subscription endpoints.
//!
//! Subscribing is idempotent: an active address is reported as already
//! subscribed, and an address that unsubscribed earlier is reactivated.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lovosis_core::SubscriberId;

use super::email;
use crate::db::NewsletterRepository;
use crate::db::newsletter::Subscription;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::models::NewsletterSubscriber;
use crate::state::AppState;

/// Subscribe and unsubscribe body.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// `DELETE /api/admin/newsletter` parameters.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: SubscriberId,
}

/// Result of a newsletter action.
#[derive(Debug, Serialize)]
pub struct NewsletterResponse {
    pub success: bool,
    pub message: &'static str,
}

impl NewsletterResponse {
    const fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Status and message for a subscribe outcome.
fn subscribe_outcome(subscription: &Subscription) -> (StatusCode, &'static str) {
    match subscription {
        Subscription::Created(_) => (StatusCode::CREATED, "Successfully subscribed to newsletter"),
        Subscription::AlreadySubscribed(_) => (StatusCode::OK, "Email is already subscribed"),
        Subscription::Reactivated(_) => (StatusCode::OK, "Subscription reactivated"),
    }
}

/// Subscribe an email address.
#[instrument(skip(state, payload))]
pub async fn subscribe(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EmailRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NewsletterResponse>)> {
    let Json(payload) = payload?;
    let email = email(&payload.email)?;

    let subscription = NewsletterRepository::new(state.pool())
        .subscribe(&email)
        .await?;
    let (status, message) = subscribe_outcome(&subscription);

    add_breadcrumb("newsletter", message, None);
    tracing::info!(subscriber_id = %subscription.subscriber().id, message, "newsletter subscribe");

    Ok((status, Json(NewsletterResponse::ok(message))))
}

/// Deactivate a subscription. Unknown addresses are a 404.
#[instrument(skip(state, payload))]
pub async fn unsubscribe(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<NewsletterResponse>> {
    let Json(payload) = payload?;
    let email = email(&payload.email)?;

    let subscriber = NewsletterRepository::new(state.pool())
        .unsubscribe(&email)
        .await?;

    tracing::info!(subscriber_id = %subscriber.id, "newsletter unsubscribe");
    Ok(Json(NewsletterResponse::ok(
        "Successfully unsubscribed from newsletter",
    )))
}

/// List subscribers, newest first.
#[instrument(skip(state, _admin))]
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsletterSubscriber>>> {
    let subscribers = NewsletterRepository::new(state.pool()).list().await?;
    Ok(Json(subscribers))
}

/// Delete a subscriber by id.
#[instrument(skip(state, admin))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    query: std::result::Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<Json<NewsletterResponse>> {
    let Query(query) = query?;

    NewsletterRepository::new(state.pool())
        .delete(query.id)
        .await?;

    tracing::info!(admin = %admin.sub, subscriber_id = %query.id, "subscriber deleted");
    Ok(Json(NewsletterResponse::ok("Subscriber deleted")))
}
