//! Product review endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lovosis_core::{Rating, ReviewId, ReviewItemType};

use super::{email, required};
use crate::db::ReviewRepository;
use crate::db::reviews::NewReview;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::models::Review;
use crate::state::AppState;

/// `GET /api/reviews` parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsQuery {
    pub item_id: i32,
    #[serde(default)]
    pub item_type: ReviewItemType,
}

/// `POST /api/reviews` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub item_id: i32,
    #[serde(default)]
    pub item_type: ReviewItemType,
    pub name: String,
    pub email: String,
    pub rating: i64,
    pub comment: String,
}

impl CreateReviewRequest {
    fn validate(self) -> Result<NewReview> {
        let rating = Rating::new(self.rating)
            .map_err(|_| AppError::BadRequest("Rating must be between 1 and 5".to_string()))?;

        Ok(NewReview {
            item_id: self.item_id,
            item_type: self.item_type,
            name: required("name", &self.name)?,
            email: email(&self.email)?,
            rating,
            comment: required("comment", &self.comment)?,
        })
    }
}

/// Confirmation body for deletes.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
}

/// List reviews for an item, newest first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ReviewsQuery>, QueryRejection>,
) -> Result<Json<Vec<Review>>> {
    let Query(query) = query?;
    let reviews = ReviewRepository::new(state.pool())
        .for_item(query.item_id, query.item_type)
        .await?;
    Ok(Json(reviews))
}

/// Create a review.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>)> {
    let Json(payload) = payload?;
    let review = payload.validate()?;

    let created = ReviewRepository::new(state.pool()).create(&review).await?;

    let item_id = review.item_id.to_string();
    add_breadcrumb(
        "reviews",
        "Review submitted",
        Some(&[("item_id", item_id.as_str())]),
    );
    tracing::info!(review_id = %created.id, item_id = review.item_id, rating = %review.rating, "review created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a review.
#[instrument(skip(state, admin))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>> {
    ReviewRepository::new(state.pool())
        .delete(ReviewId::new(id))
        .await?;

    tracing::info!(admin = %admin.sub, review_id = id, "review deleted");
    Ok(Json(DeletedResponse {
        message: "Review deleted successfully",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(rating: i64) -> CreateReviewRequest {
        CreateReviewRequest {
            item_id: 42,
            item_type: ReviewItemType::Product,
            name: "  Ravi  ".to_string(),
            email: "Ravi@Example.com".to_string(),
            rating,
            comment: " Sturdy and accurate. ".to_string(),
        }
    }

    #[test]
    fn test_valid_review_is_trimmed_and_normalized() {
        let review = request(5).validate().unwrap();
        assert_eq!(review.name, "Ravi");
        assert_eq!(review.email.as_str(), "ravi@example.com");
        assert_eq!(review.rating.value(), 5);
        assert_eq!(review.comment, "Sturdy and accurate.");
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        for rating in [0, 6, -1] {
            let err = request(rating).validate().unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_blank_comment_is_rejected() {
        let mut req = request(4);
        req.comment = "   ".to_string();
        assert!(matches!(
            req.validate(),
            Err(AppError::BadRequest(m)) if m == "comment is required"
        ));
    }

    #[test]
    fn test_item_type_defaults_to_product() {
        let req: CreateReviewRequest = serde_json::from_str(
            r#"{"itemId":1,"name":"A","email":"a@b.co","rating":3,"comment":"ok"}"#,
        )
        .unwrap();
        assert_eq!(req.item_type, ReviewItemType::Product);
    }
}
