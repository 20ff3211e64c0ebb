// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process configuration from flags, environment and `.env`

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::generation::CompletionConfig;
use crate::vision::{DetectionParams, VisionModelConfig};

/// API key values that mean "not configured"
pub const PLACEHOLDER_API_KEYS: &[&str] = &["Add a openAI API Key", "your-api-key", "changeme"];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("OPENAI_API_KEY is a placeholder value: '{0}'")]
    PlaceholderApiKey(String),

    #[error("temperature must be between 0 and 2, got {0}")]
    InvalidTemperature(f32),

    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("at least one CORS origin is required")]
    EmptyCorsOrigins,
}

/// Image analysis backend
#[derive(Parser, Debug, Clone)]
#[command(name = "scenescribe")]
#[command(version)]
#[command(about = "Object and scene detection with generated descriptions", long_about = None)]
pub struct ServiceConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Bearer token for the completion API
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Chat-completion endpoint
    #[arg(
        long,
        env = "OPENAI_API_URL",
        default_value = "https://api.openai.com/v1/chat/completions"
    )]
    pub openai_api_url: String,

    /// Completion model name
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4")]
    pub openai_model: String,

    /// Sampling temperature
    #[arg(long, env = "OPENAI_TEMPERATURE", default_value_t = 0.4)]
    pub openai_temperature: f32,

    /// Per-request timeout for the completion API, in seconds
    #[arg(long, env = "GENERATION_TIMEOUT_SECS", default_value_t = 120)]
    pub generation_timeout_secs: u64,

    /// YOLOv8 ONNX export
    #[arg(long, env = "DETECTOR_MODEL_PATH", default_value = "./yolov8n.onnx")]
    pub detector_model_path: PathBuf,

    /// CLIP checkpoint directory (visual.onnx, textual.onnx, tokenizer.json)
    #[arg(
        long,
        env = "CLIP_MODEL_DIR",
        default_value = "./models/clip-vit-b-32-laion2b"
    )]
    pub clip_model_dir: PathBuf,

    /// Minimum detector confidence
    #[arg(long, env = "DETECTION_CONFIDENCE", default_value_t = 0.25)]
    pub detection_confidence: f32,

    /// IoU above which same-class boxes are suppressed
    #[arg(long, env = "DETECTION_IOU", default_value_t = 0.7)]
    pub detection_iou: f32,

    /// Comma-separated list of allowed CORS origins
    #[arg(
        long,
        env = "CORS_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:8080,https://yourfrontend.com"
    )]
    pub cors_allowed_origins: Vec<String>,
}

impl ServiceConfig {
    /// Reject configurations that would only fail later, at request time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self
            .openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        if PLACEHOLDER_API_KEYS.contains(&key) {
            return Err(ConfigError::PlaceholderApiKey(key.to_string()));
        }

        if !(0.0..=2.0).contains(&self.openai_temperature) {
            return Err(ConfigError::InvalidTemperature(self.openai_temperature));
        }

        for (name, value) in [
            ("DETECTION_CONFIDENCE", self.detection_confidence),
            ("DETECTION_IOU", self.detection_iou),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if self.cors_origins().is_empty() {
            return Err(ConfigError::EmptyCorsOrigins);
        }

        Ok(())
    }

    /// Allowed origins with blanks dropped
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The API key is trimmed the same way `validate` checks it
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            api_url: self.openai_api_url.clone(),
            api_key: self
                .openai_api_key
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            model: self.openai_model.clone(),
            temperature: self.openai_temperature,
            timeout: Duration::from_secs(self.generation_timeout_secs),
        }
    }

    pub fn vision_config(&self) -> VisionModelConfig {
        VisionModelConfig {
            detector_model_path: self.detector_model_path.clone(),
            clip_model_dir: self.clip_model_dir.clone(),
            detection: DetectionParams {
                confidence_threshold: self.detection_confidence,
                iou_threshold: self.detection_iou,
                ..DetectionParams::default()
            },
        }
    }
}
