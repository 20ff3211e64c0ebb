// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze image endpoint handler

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use tracing::{debug, warn};

use super::response::AnalyzeImageResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// Name of the multipart field carrying the image
pub const UPLOAD_FIELD: &str = "file";

/// POST /analyze-image/ - Detect objects and scene, then generate text
///
/// Pipeline:
/// 1. Read the `file` field from the multipart body
/// 2. Decode and run both vision models (blocking pool)
/// 3. Generate a paragraph and a poem
/// 4. Return labels and generated text
pub async fn analyze_image_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeImageResponse>, ApiError> {
    let multipart = multipart.map_err(|e| {
        warn!("Rejected upload: {}", e);
        ApiError::InvalidUpload {
            status: e.status(),
            message: e.body_text(),
        }
    })?;

    let bytes = read_upload(multipart).await.map_err(|e| {
        warn!("Failed to read upload: {}", e);
        e
    })?;
    debug!("Received upload: {} bytes", bytes.len());

    let report = state.analyzer.analyze(bytes).await.map_err(|e| {
        warn!("Image analysis failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(AnalyzeImageResponse::from(report)))
}

/// Pull the bytes of the `file` field, skipping any other fields
///
/// Stream errors keep the status the multipart reader assigns, so a body over
/// the size limit is reported as 413.
pub async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let data = field.bytes().await.map_err(upload_error)?;
        return Ok(data.to_vec());
    }

    Err(ApiError::InvalidUpload {
        status: StatusCode::BAD_REQUEST,
        message: format!("missing multipart field '{}'", UPLOAD_FIELD),
    })
}

fn upload_error(e: MultipartError) -> ApiError {
    ApiError::InvalidUpload {
        status: e.status(),
        message: e.body_text(),
    }
}
