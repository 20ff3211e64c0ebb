// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding of raw YOLOv8 output into detections

use anyhow::Result;
use ndarray::{ArrayView2, ArrayViewD, Axis, Ix2};
use std::cmp::Ordering;

use super::labels::{class_name, COCO_CLASSES};
use super::preprocessing::Letterbox;
use crate::vision::traits::{BoundingBox, Detection};

/// Thresholds applied after inference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub max_detections: usize,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }
}

/// Parse a YOLOv8 output tensor
///
/// The export emits `[1, 4 + classes, anchors]`, where the first four rows
/// are `cx, cy, w, h` in model-input pixels and the rest are per-class scores.
/// Some exports are transposed to `[1, anchors, 4 + classes]`; both are accepted.
pub fn parse_yolo_output(
    output: ArrayViewD<f32>,
    letterbox: &Letterbox,
    params: &DetectionParams,
) -> Result<Vec<Detection>> {
    let shape = output.shape().to_vec();
    if shape.len() != 3 || shape[0] != 1 {
        anyhow::bail!("Unexpected detector output shape: {:?}", shape);
    }

    let features = 4 + COCO_CLASSES.len();
    let batch = output.index_axis(Axis(0), 0).into_dimensionality::<Ix2>()?;
    // Normalize to [features, anchors]
    let rows: ArrayView2<f32> = if shape[1] == features {
        batch
    } else if shape[2] == features {
        batch.reversed_axes()
    } else {
        anyhow::bail!(
            "Detector output has {:?}, expected {} features per anchor",
            shape,
            features
        );
    };

    let mut candidates = Vec::new();
    for anchor in rows.axis_iter(Axis(1)) {
        let (class_id, confidence) = anchor
            .iter()
            .skip(4)
            .copied()
            .enumerate()
            .fold((0usize, f32::MIN), |best, (i, score)| {
                if score > best.1 {
                    (i, score)
                } else {
                    best
                }
            });

        if confidence < params.confidence_threshold {
            continue;
        }

        let (cx, cy, w, h) = (anchor[0], anchor[1], anchor[2], anchor[3]);
        let Some(label) = class_name(class_id) else {
            continue;
        };

        candidates.push(Detection {
            class_id,
            label: label.to_string(),
            confidence,
            bounding_box: BoundingBox {
                x: cx - w / 2.0,
                y: cy - h / 2.0,
                width: w,
                height: h,
            },
        });
    }

    let kept = non_max_suppression(candidates, params.iou_threshold, params.max_detections);

    Ok(kept
        .into_iter()
        .map(|mut d| {
            let b = d.bounding_box;
            let x1 = letterbox.unmap_x(b.x);
            let y1 = letterbox.unmap_y(b.y);
            let x2 = letterbox.unmap_x(b.x + b.width);
            let y2 = letterbox.unmap_y(b.y + b.height);
            d.bounding_box = BoundingBox {
                x: x1,
                y: y1,
                width: x2 - x1,
                height: y2 - y1,
            };
            d
        })
        .collect())
}

/// Class-aware greedy NMS, highest confidence first
pub fn non_max_suppression(
    mut candidates: Vec<Detection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Detection> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id
                && k.bounding_box.iou(&candidate.bounding_box) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}
