// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RootResponse {
    pub message: String,
}

/// GET / - liveness message
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Backend is running!".to_string(),
    })
}
