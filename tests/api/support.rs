// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fakes and request builders for the HTTP tests

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use scenescribe::{
    analysis::ImageAnalyzer,
    api::{create_app, AppState},
    generation::TextGenerator,
    vision::{BoundingBox, Detection, ObjectDetector, SceneClassifier, SceneMatch, SCENE_LABELS},
};
use std::io::Cursor;
use std::sync::Arc;

pub const BOUNDARY: &str = "scenescribe-test-boundary";

pub fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "https://yourfrontend.com".to_string(),
    ]
}

mockall::mock! {
    pub Generator {}

    #[async_trait]
    impl TextGenerator for Generator {
        async fn generate(&self, prompt: &str) -> String;
    }
}

/// Detector that always reports the same labels
pub struct FakeDetector {
    pub labels: Vec<&'static str>,
}

impl ObjectDetector for FakeDetector {
    fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        Ok(self
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| Detection {
                class_id: i,
                label: label.to_string(),
                confidence: 0.8,
                bounding_box: BoundingBox {
                    x: 1.0,
                    y: 1.0,
                    width: 4.0,
                    height: 4.0,
                },
            })
            .collect())
    }
}

pub struct BrokenDetector;

impl ObjectDetector for BrokenDetector {
    fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        anyhow::bail!("output tensor has wrong shape")
    }
}

/// Classifier over the real vocabulary that always picks one index
pub struct FakeScene {
    labels: Vec<String>,
    index: usize,
}

impl FakeScene {
    pub fn picking(label: &str) -> Self {
        let labels: Vec<String> = SCENE_LABELS.iter().map(|s| s.to_string()).collect();
        let index = labels.iter().position(|l| l == label).unwrap();
        Self { labels, index }
    }
}

impl SceneClassifier for FakeScene {
    fn classify(&self, _image: &DynamicImage) -> anyhow::Result<SceneMatch> {
        let mut scores = vec![0.0; self.labels.len()];
        scores[self.index] = 1.0;
        Ok(SceneMatch {
            index: self.index,
            label: self.labels[self.index].clone(),
            score: 1.0,
            scores,
        })
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Generator that echoes the prompt
pub struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> String {
        format!("echo: {}", prompt)
    }
}

pub fn build_app(
    detector: impl ObjectDetector + 'static,
    classifier: impl SceneClassifier + 'static,
    generator: impl TextGenerator + 'static,
) -> Router {
    let analyzer = ImageAnalyzer::new(Arc::new(detector), Arc::new(classifier), Arc::new(generator));
    create_app(AppState::new(analyzer), &default_origins()).unwrap()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 120, 200])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// A multipart/form-data body with one field
pub fn multipart_body(field_name: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(field_name: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/analyze-image/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field_name, "upload.png", data)))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}
