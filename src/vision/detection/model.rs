// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 object detector backed by ONNX Runtime

use anyhow::{Context, Result};
use image::DynamicImage;
use ort::value::Value;
use std::path::Path;
use tracing::debug;

use super::postprocess::{parse_yolo_output, DetectionParams};
use super::preprocessing::preprocess_for_detection;
use crate::vision::session::{ExecutionDevice, OnnxSession};
use crate::vision::traits::{Detection, ObjectDetector};

/// YOLOv8 detector over the 80 COCO classes
///
/// Expects an export with a single `[1, 3, 640, 640]` image input and a
/// single `[1, 84, N]` output.
#[derive(Debug, Clone)]
pub struct YoloDetector {
    session: OnnxSession,
    params: DetectionParams,
}

impl YoloDetector {
    /// Load the detector from an ONNX file
    pub fn load(model_path: &Path, params: DetectionParams) -> Result<Self> {
        let session = OnnxSession::load(model_path, "Detector")?;
        Ok(Self { session, params })
    }

    pub fn device(&self) -> ExecutionDevice {
        self.session.device
    }
}

impl ObjectDetector for YoloDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let (input, letterbox) = preprocess_for_detection(image);

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let mut session = self.session.lock()?;
        let outputs = session
            .run(ort::inputs![&self.session.input_name => input_value])
            .context("Detection inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract detector output")?;

        let detections = parse_yolo_output(output_tensor.view(), &letterbox, &self.params)?;

        debug!(
            "Detected {} objects: {:?}",
            detections.len(),
            detections.iter().map(|d| d.label.as_str()).collect::<Vec<_>>()
        );

        Ok(detections)
    }
}
