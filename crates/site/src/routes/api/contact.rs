//! Contact form endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{email, phone, required};
use crate::db::LeadRepository;
use crate::db::leads::NewContactMessage;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::models::ContactMessage;
use crate::state::AppState;

/// `POST /api/contact` body.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactRequest {
    fn validate(self) -> Result<NewContactMessage> {
        Ok(NewContactMessage {
            name: required("name", &self.name)?,
            email: email(&self.email)?,
            phone: phone(&self.phone)?,
            subject: required("subject", &self.subject)?,
            message: required("message", &self.message)?,
        })
    }
}

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Store a contact message.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    let Json(payload) = payload?;
    let message = payload.validate()?;

    let created = LeadRepository::new(state.pool())
        .create_contact_message(&message)
        .await?;

    add_breadcrumb(
        "contact",
        "Contact message sent",
        Some(&[("subject", message.subject.as_str())]),
    );
    tracing::info!(message_id = %created.id, "contact message stored");

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            message: "Message sent successfully",
        }),
    ))
}

/// List contact messages, newest first.
#[instrument(skip(state, _admin))]
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactMessage>>> {
    let messages = LeadRepository::new(state.pool()).contact_messages().await?;
    Ok(Json(messages))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            name: "Anil".to_string(),
            email: "anil@school.org".to_string(),
            phone: "(080) 4123 4567".to_string(),
            subject: " Quote ".to_string(),
            message: "Need 20 physics kits.".to_string(),
        }
    }

    #[test]
    fn test_valid_message() {
        let message = request().validate().unwrap();
        assert_eq!(message.subject, "Quote");
        assert_eq!(message.phone, "(080) 4123 4567");
    }

    #[test]
    fn test_each_field_is_required() {
        let blanks: [fn(&mut ContactRequest); 3] = [
            |r| r.name.clear(),
            |r| r.subject.clear(),
            |r| r.message = "  ".to_string(),
        ];
        for blank in blanks {
            let mut req = request();
            blank(&mut req);
            assert_eq!(req.validate().unwrap_err().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_nine_digit_phone_is_rejected() {
        let mut req = request();
        req.phone = "123-456-789".to_string();
        assert!(req.validate().is_err());
    }
}
