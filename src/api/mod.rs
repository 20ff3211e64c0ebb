// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze_image;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use analyze_image::{analyze_image_handler, AnalyzeImageResponse};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{root_handler, RootResponse};
pub use http_server::{create_app, start_server, AppState};
