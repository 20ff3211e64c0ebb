// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for image analysis
//!
//! This module provides:
//! - Image decoding with format sniffing
//! - Object detection via YOLOv8
//! - Zero-shot scene classification via CLIP
//!
//! Each ONNX session tries CUDA first and falls back to CPU.

pub mod clip;
pub mod detection;
pub mod image_utils;
pub mod model_manager;
pub mod session;
pub mod traits;

pub use clip::{ClipSceneClassifier, SCENE_LABELS};
pub use detection::{DetectionParams, YoloDetector};
pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo, MAX_IMAGE_SIZE};
pub use model_manager::{VisionModelConfig, VisionModelInfo, VisionModelManager};
pub use session::{ExecutionDevice, OnnxSession};
pub use traits::{BoundingBox, Detection, ObjectDetector, SceneClassifier, SceneMatch};
