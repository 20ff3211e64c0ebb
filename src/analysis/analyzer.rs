// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload-to-report pipeline

use anyhow::Context;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::prompts::{objects_phrase, paragraph_prompt, poem_prompt};
use crate::generation::TextGenerator;
use crate::vision::{decode_image_bytes, ImageError, ObjectDetector, SceneClassifier};

/// Request-fatal failures
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Decode(#[from] ImageError),

    #[error("{0:#}")]
    Inference(anyhow::Error),
}

/// Everything produced for one image
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Unique detected labels, sorted
    pub objects: Vec<String>,
    pub scenery: String,
    pub description: String,
    pub poem: String,
}

/// Labels derived from the vision models, before text generation
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLabels {
    pub objects: BTreeSet<String>,
    pub scenery: String,
}

/// Runs detection, scene classification and text generation for one upload
#[derive(Clone)]
pub struct ImageAnalyzer {
    detector: Arc<dyn ObjectDetector>,
    classifier: Arc<dyn SceneClassifier>,
    generator: Arc<dyn TextGenerator>,
}

impl ImageAnalyzer {
    pub fn new(
        detector: Arc<dyn ObjectDetector>,
        classifier: Arc<dyn SceneClassifier>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            detector,
            classifier,
            generator,
        }
    }

    /// Decode the image and run both vision models
    ///
    /// Blocking; the async entry point moves this onto the blocking pool.
    pub fn label_image(&self, bytes: &[u8]) -> Result<ImageLabels, AnalysisError> {
        let (image, info) = decode_image_bytes(bytes)?;
        debug!(
            "Decoded {:?} image {}x{} ({} bytes)",
            info.format, info.width, info.height, info.size_bytes
        );

        let objects: BTreeSet<String> = self
            .detector
            .detect(&image)
            .context("Object detection failed")
            .map_err(AnalysisError::Inference)?
            .into_iter()
            .map(|d| d.label)
            .collect();

        let scene = self
            .classifier
            .classify(&image)
            .context("Scene classification failed")
            .map_err(AnalysisError::Inference)?;

        Ok(ImageLabels {
            objects,
            scenery: scene.label,
        })
    }

    /// Full pipeline for one uploaded image
    pub async fn analyze(&self, bytes: Vec<u8>) -> Result<AnalysisReport, AnalysisError> {
        let analyzer = self.clone();
        let labels = tokio::task::spawn_blocking(move || analyzer.label_image(&bytes))
            .await
            .context("Vision task panicked")
            .map_err(AnalysisError::Inference)??;

        let objects: Vec<String> = labels.objects.into_iter().collect();
        let objects_str = objects_phrase(&objects);

        info!("objects: {}", objects_str);
        info!("scene: {}", labels.scenery);

        let paragraph = paragraph_prompt(&objects_str, &labels.scenery);
        let poem = poem_prompt(&objects_str, &labels.scenery);

        let (description, poem) = tokio::join!(
            self.generator.generate(&paragraph),
            self.generator.generate(&poem)
        );

        Ok(AnalysisReport {
            objects,
            scenery: labels.scenery,
            description,
            poem,
        })
    }
}
