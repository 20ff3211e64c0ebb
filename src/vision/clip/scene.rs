// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scene vocabulary and similarity scoring

use anyhow::Result;
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::vision::traits::SceneMatch;

/// The fixed scene vocabulary, in scoring order
pub const SCENE_LABELS: [&str; 17] = [
    "natural scene",
    "city",
    "ocean",
    "forest",
    "desert",
    "mountain",
    "sunset",
    "beach",
    "snowy landscape",
    "rural area",
    "lake",
    "park",
    "urban landscape",
    "tropical rainforest",
    "countryside",
    "waterfall",
    "office",
];

/// CLIP's learned temperature, applied to the similarity logits
pub const LOGIT_SCALE: f32 = 100.0;

/// Scale a vector to unit length; zero vectors are returned unchanged
pub fn l2_normalize(v: ArrayView1<f32>) -> Array1<f32> {
    let norm = v.dot(&v).sqrt();
    if norm > 0.0 {
        v.mapv(|x| x / norm)
    } else {
        v.to_owned()
    }
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first one wins on ties
pub fn argmax_first(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Pick the scene whose text embedding is closest to the image embedding
///
/// `text_embeddings` holds one raw (unnormalized) row per label. Only the image
/// embedding is normalized, which scales every logit equally, so the ranking
/// follows the raw dot products and longer text embeddings keep their weight.
pub fn select_scene(
    image_embedding: ArrayView1<f32>,
    text_embeddings: ArrayView2<f32>,
    labels: &[String],
) -> Result<SceneMatch> {
    if text_embeddings.nrows() != labels.len() {
        anyhow::bail!(
            "Have {} text embeddings for {} scene labels",
            text_embeddings.nrows(),
            labels.len()
        );
    }
    if text_embeddings.ncols() != image_embedding.len() {
        anyhow::bail!(
            "Embedding width mismatch: image {}, text {}",
            image_embedding.len(),
            text_embeddings.ncols()
        );
    }

    let image_embedding = l2_normalize(image_embedding);
    let logits: Vec<f32> = text_embeddings
        .dot(&image_embedding)
        .iter()
        .map(|s| s * LOGIT_SCALE)
        .collect();
    let scores = softmax(&logits);

    let index = argmax_first(&scores).ok_or_else(|| anyhow::anyhow!("Scene vocabulary is empty"))?;

    Ok(SceneMatch {
        index,
        label: labels[index].clone(),
        score: scores[index],
        scores,
    })
}
