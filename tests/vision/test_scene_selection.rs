// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Scene selection over the fixed vocabulary

use ndarray::Array2;
use scenescribe::vision::clip::{argmax_first, select_scene, softmax, SCENE_LABELS};

fn vocabulary() -> Vec<String> {
    SCENE_LABELS.iter().map(|s| s.to_string()).collect()
}

/// One-hot text embeddings, one axis per label
fn one_hot_embeddings(n: usize) -> Array2<f32> {
    Array2::from_shape_fn((n, n), |(i, j)| if i == j { 1.0 } else { 0.0 })
}

#[test]
fn test_vocabulary_is_fixed() {
    assert_eq!(
        SCENE_LABELS,
        [
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
        ]
    );
}

#[test]
fn test_every_label_is_reachable() {
    let labels = vocabulary();
    let text = one_hot_embeddings(labels.len());
    for (i, expected) in labels.iter().enumerate() {
        let image = text.row(i).to_owned();
        let scene = select_scene(image.view(), text.view(), &labels).unwrap();
        assert_eq!(&scene.label, expected);
        assert_eq!(scene.index, i);
    }
}

#[test]
fn test_always_picks_from_vocabulary() {
    let labels = vocabulary();
    let text = one_hot_embeddings(labels.len());
    // Uniform image embedding: every label ties
    let image = ndarray::Array1::from_elem(labels.len(), 1.0f32);
    let scene = select_scene(image.view(), text.view(), &labels).unwrap();
    assert_eq!(scene.label, "natural scene");
    assert!(SCENE_LABELS.contains(&scene.label.as_str()));

    let total: f32 = scene.scores.iter().sum();
    assert!((total - 1.0).abs() < 1e-4);
}

#[test]
fn test_softmax_argmax_agree() {
    let logits = [2.0, 7.5, 7.5, -1.0];
    let probs = softmax(&logits);
    assert_eq!(argmax_first(&probs), Some(1));
    assert_eq!(argmax_first(&logits), Some(1));
}
