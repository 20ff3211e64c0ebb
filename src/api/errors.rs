// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::AnalysisError;
use crate::vision::ImageError;

/// Prefix of every request-fatal error message
pub const ERROR_PREFIX: &str = "Failed to process image:";

/// Body of a failed analysis; carries no other keys
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Multipart body unreadable or missing the `file` field; `status` is 400
    /// or 413 when the body exceeds the size limit
    InvalidUpload { status: StatusCode, message: String },
    InvalidImage(ImageError),
    InferenceFailed(anyhow::Error),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: format!("{} {}", ERROR_PREFIX, self.details()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidUpload { status, .. } => *status,
            ApiError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ApiError::InferenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> String {
        match self {
            ApiError::InvalidUpload { message, .. } => message.clone(),
            ApiError::InvalidImage(e) => e.to_string(),
            ApiError::InferenceFailed(e) => format!("{:#}", e),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Decode(e) => ApiError::InvalidImage(e),
            AnalysisError::Inference(e) => ApiError::InferenceFailed(e),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", ERROR_PREFIX, self.details())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
