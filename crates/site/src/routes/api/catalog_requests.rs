//! Catalog request (lead capture) endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use super::{email, optional, phone, required};
use crate::db::LeadRepository;
use crate::db::leads::NewCatalogRequest;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::models::CatalogRequest;
use crate::state::AppState;

/// `POST /api/catalog-requests` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatalogRequest {
    pub full_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub product_name: String,
    #[serde(default)]
    pub catalog_images: Vec<String>,
}

impl CreateCatalogRequest {
    fn validate(self) -> Result<NewCatalogRequest> {
        Ok(NewCatalogRequest {
            full_name: required("fullName", &self.full_name)?,
            company_name: optional(self.company_name.as_deref()),
            email: email(&self.email)?,
            phone: phone(&self.phone)?,
            product_name: required("productName", &self.product_name)?,
            catalog_images: self
                .catalog_images
                .into_iter()
                .filter_map(|url| optional(Some(&url)))
                .collect(),
        })
    }
}

/// Record a request for a product catalog.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateCatalogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CatalogRequest>)> {
    let Json(payload) = payload?;
    let request = payload.validate()?;

    let created = LeadRepository::new(state.pool())
        .create_catalog_request(&request)
        .await?;

    add_breadcrumb(
        "catalog_requests",
        "Catalog requested",
        Some(&[("product", request.product_name.as_str())]),
    );
    tracing::info!(request_id = %created.id, product = %request.product_name, "catalog request created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// List catalog requests, newest first.
#[instrument(skip(state, _admin))]
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogRequest>>> {
    let requests = LeadRepository::new(state.pool()).catalog_requests().await?;
    Ok(Json(requests))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CreateCatalogRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let request = parse(
            r#"{
                "fullName": " Meera Iyer ",
                "companyName": "  ",
                "email": "MEERA@college.edu",
                "phone": "080-2345-6789",
                "productName": "Digital Oscilloscope",
                "catalogImages": ["/api/files/a", " ", "/api/files/b"]
            }"#,
        )
        .validate()
        .unwrap();

        assert_eq!(request.full_name, "Meera Iyer");
        assert_eq!(request.company_name, None);
        assert_eq!(request.email.as_str(), "meera@college.edu");
        assert_eq!(request.catalog_images, ["/api/files/a", "/api/files/b"]);
    }

    #[test]
    fn test_short_phone_is_rejected() {
        let err = parse(
            r#"{"fullName":"A","email":"a@b.co","phone":"12345","productName":"X"}"#,
        )
        .validate()
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_product_name_is_rejected() {
        let err = parse(
            r#"{"fullName":"A","email":"a@b.co","phone":"9876543210","productName":""}"#,
        )
        .validate()
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
