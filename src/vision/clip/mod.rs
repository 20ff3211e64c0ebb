// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Zero-shot scene classification with CLIP

pub mod model;
pub mod preprocessing;
pub mod scene;
pub mod tokenizer;

pub use model::{ClipSceneClassifier, TEXTUAL_MODEL_FILE, TOKENIZER_FILE, VISUAL_MODEL_FILE};
pub use preprocessing::{preprocess_for_clip, CLIP_INPUT_SIZE, CLIP_MEAN, CLIP_STD};
pub use scene::{argmax_first, select_scene, softmax, LOGIT_SCALE, SCENE_LABELS};
pub use tokenizer::{ClipTokenizer, CONTEXT_LENGTH};
