// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze image API endpoint module
//!
//! Provides POST /analyze-image/ for multipart image uploads.

pub mod handler;
pub mod response;

pub use handler::{analyze_image_handler, read_upload, UPLOAD_FIELD};
pub use response::AnalyzeImageResponse;
