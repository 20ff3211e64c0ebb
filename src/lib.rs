// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analysis;
pub mod api;
pub mod config;
pub mod generation;
pub mod vision;

pub use analysis::{AnalysisError, AnalysisReport, ImageAnalyzer};
pub use api::{create_app, start_server, AppState};
pub use config::ServiceConfig;
pub use generation::{CompletionClient, TextGenerator};
pub use vision::{ObjectDetector, SceneClassifier, VisionModelManager};
