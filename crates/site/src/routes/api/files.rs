//! File upload and download.
//!
//! Uploaded images are stored in `PostgreSQL` and served back from
//! `/api/files/{id}`. Files never change once stored, so downloads are
//! cached for a year.

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::db::FileRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::submissions::file_url;
use crate::state::AppState;

/// Name of the multipart field carrying the file.
const FILE_FIELD: &str = "file";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Store the multipart `file` field and return its public URL.
#[instrument(skip(state, admin, multipart))]
pub async fn upload(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        let size = data.len();
        let id = FileRepository::new(state.pool())
            .store(&filename, &content_type, data.to_vec())
            .await?;

        tracing::info!(admin = %admin.sub, file_id = %id, %filename, size, "file uploaded");
        return Ok(Json(UploadResponse { url: file_url(id) }));
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}

/// Serve a stored file with its content type.
#[instrument(skip(state))]
pub async fn download(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response> {
    let file = FileRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let content_type = HeaderValue::from_str(&file.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=31536000, immutable"),
            ),
        ],
        file.data,
    )
        .into_response())
}
