// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection
//!
//! Letterboxed YOLOv8 inference over COCO classes, followed by confidence
//! filtering and class-aware non-maximum suppression.

pub mod labels;
pub mod model;
pub mod postprocess;
pub mod preprocessing;

pub use labels::{class_name, COCO_CLASSES};
pub use model::YoloDetector;
pub use postprocess::{non_max_suppression, parse_yolo_output, DetectionParams};
pub use preprocessing::{preprocess_for_detection, Letterbox, DETECTOR_INPUT_SIZE};
