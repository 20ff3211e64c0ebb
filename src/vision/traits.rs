// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model seams used by the analysis pipeline
//!
//! The request handler only sees these traits, so tests can swap the ONNX
//! models for fakes.

use anyhow::Result;
use image::DynamicImage;
use serde::Serialize;

/// Axis-aligned box in original image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection over union with another box
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

/// A single detected object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub class_id: usize,
    pub label: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

/// The scene label picked for an image, with the full score distribution
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMatch {
    /// Index into the classifier's label vocabulary
    pub index: usize,
    pub label: String,
    /// Softmax probability of the chosen label
    pub score: f32,
    /// Softmax probabilities for every label, in vocabulary order
    pub scores: Vec<f32>,
}

/// Finds objects in an image
pub trait ObjectDetector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>>;
}

/// Picks exactly one scene label for an image
pub trait SceneClassifier: Send + Sync {
    fn classify(&self, image: &DynamicImage) -> Result<SceneMatch>;

    /// The fixed vocabulary the classifier chooses from
    fn labels(&self) -> &[String];
}
