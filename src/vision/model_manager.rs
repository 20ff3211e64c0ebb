// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision model manager for loading the detector and the scene classifier

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

use crate::vision::clip::{ClipSceneClassifier, SCENE_LABELS};
use crate::vision::detection::{DetectionParams, YoloDetector};
use crate::vision::session::ExecutionDevice;
use crate::vision::traits::{ObjectDetector, SceneClassifier};

/// Configuration for loading vision models
#[derive(Debug, Clone)]
pub struct VisionModelConfig {
    /// Path to the YOLOv8 ONNX export
    pub detector_model_path: PathBuf,
    /// Directory holding visual.onnx, textual.onnx and tokenizer.json
    pub clip_model_dir: PathBuf,
    /// Detector thresholds
    pub detection: DetectionParams,
}

impl Default for VisionModelConfig {
    fn default() -> Self {
        Self {
            detector_model_path: PathBuf::from("./yolov8n.onnx"),
            clip_model_dir: PathBuf::from("./models/clip-vit-b-32-laion2b"),
            detection: DetectionParams::default(),
        }
    }
}

/// Information about a loaded vision model
#[derive(Debug, Clone)]
pub struct VisionModelInfo {
    /// Model name
    pub name: String,
    /// Model type (detection, scene)
    pub model_type: String,
    /// Execution provider the model runs on
    pub device: ExecutionDevice,
}

/// Owner of both vision models
///
/// Both models are required. Unlike optional capability models, a missing or
/// broken artifact here fails the whole load.
pub struct VisionModelManager {
    detector: Arc<YoloDetector>,
    classifier: Arc<ClipSceneClassifier>,
}

impl VisionModelManager {
    /// Load the detector and the scene classifier
    ///
    /// Blocking; call from `spawn_blocking` when inside the runtime.
    pub fn load(config: &VisionModelConfig) -> anyhow::Result<Self> {
        let detector = YoloDetector::load(&config.detector_model_path, config.detection)
            .with_context(|| {
                format!(
                    "Failed to load object detector from {}",
                    config.detector_model_path.display()
                )
            })?;
        tracing::info!(
            "✅ Object detector loaded from {}",
            config.detector_model_path.display()
        );

        let classifier = ClipSceneClassifier::load(&config.clip_model_dir, &SCENE_LABELS)
            .with_context(|| {
                format!(
                    "Failed to load scene classifier from {}",
                    config.clip_model_dir.display()
                )
            })?;
        tracing::info!(
            "✅ Scene classifier loaded from {}",
            config.clip_model_dir.display()
        );

        Ok(Self {
            detector: Arc::new(detector),
            classifier: Arc::new(classifier),
        })
    }

    pub fn detector(&self) -> Arc<dyn ObjectDetector> {
        self.detector.clone()
    }

    pub fn scene_classifier(&self) -> Arc<dyn SceneClassifier> {
        self.classifier.clone()
    }

    /// List loaded models and where they run
    pub fn list_models(&self) -> Vec<VisionModelInfo> {
        vec![
            VisionModelInfo {
                name: "yolov8".to_string(),
                model_type: "detection".to_string(),
                device: self.detector.device(),
            },
            VisionModelInfo {
                name: "clip-vit-b-32".to_string(),
                model_type: "scene".to_string(),
                device: self.classifier.device(),
            },
        ]
    }
}
