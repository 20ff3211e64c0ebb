// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! CLIP zero-shot scene classifier
//!
//! Holds the visual and text towers of a CLIP checkpoint exported to ONNX.
//! Text embeddings for the scene vocabulary are computed once at load time,
//! so each request only runs the visual tower.

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::{Array1, Array2, Ix2};
use ort::value::Value;
use std::path::Path;
use tracing::{debug, info};

use super::preprocessing::preprocess_for_clip;
use super::scene::select_scene;
use super::tokenizer::ClipTokenizer;
use crate::vision::session::{ExecutionDevice, OnnxSession};
use crate::vision::traits::{SceneClassifier, SceneMatch};

/// File name of the visual tower inside the checkpoint directory
pub const VISUAL_MODEL_FILE: &str = "visual.onnx";
/// File name of the text tower inside the checkpoint directory
pub const TEXTUAL_MODEL_FILE: &str = "textual.onnx";
/// File name of the tokenizer inside the checkpoint directory
pub const TOKENIZER_FILE: &str = "tokenizer.json";

#[derive(Debug, Clone)]
pub struct ClipSceneClassifier {
    visual: OnnxSession,
    labels: Vec<String>,
    /// Raw text-tower output, one row per label
    text_embeddings: Array2<f32>,
}

impl ClipSceneClassifier {
    /// Load both towers from `model_dir` and embed `labels`
    pub fn load(model_dir: &Path, labels: &[&str]) -> Result<Self> {
        if labels.is_empty() {
            anyhow::bail!("Scene vocabulary must not be empty");
        }
        if !model_dir.is_dir() {
            anyhow::bail!("CLIP model directory not found: {}", model_dir.display());
        }

        let tokenizer = ClipTokenizer::from_file(&model_dir.join(TOKENIZER_FILE))?;
        let visual = OnnxSession::load(&model_dir.join(VISUAL_MODEL_FILE), "CLIP visual")?;
        let textual = OnnxSession::load(&model_dir.join(TEXTUAL_MODEL_FILE), "CLIP text")?;

        let token_ids = tokenizer.encode_batch(labels)?;
        // Kept unnormalized; scene scoring ranks by raw dot product
        let text_embeddings = embed_texts(&textual, token_ids)?;
        if text_embeddings.nrows() != labels.len() {
            anyhow::bail!(
                "CLIP text encoder returned {} rows for {} labels",
                text_embeddings.nrows(),
                labels.len()
            );
        }

        info!(
            "✅ Embedded {} scene labels (dim {})",
            labels.len(),
            text_embeddings.ncols()
        );

        Ok(Self {
            visual,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            text_embeddings,
        })
    }

    pub fn device(&self) -> ExecutionDevice {
        self.visual.device
    }

    /// Raw image embedding from the visual tower
    pub fn embed_image(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let input = preprocess_for_clip(image);
        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let mut session = self.visual.lock()?;
        let outputs = session
            .run(ort::inputs![&self.visual.input_name => input_value])
            .context("CLIP visual inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract image embedding")?;

        Ok(output_tensor.iter().copied().collect())
    }
}

/// Run the text tower over a `[labels, 77]` id matrix
fn embed_texts(textual: &OnnxSession, token_ids: Array2<i64>) -> Result<Array2<f32>> {
    let input_value = Value::from_array(token_ids).context("Failed to create token tensor")?;

    let mut session = textual.lock()?;
    let outputs = session
        .run(ort::inputs![&textual.input_name => input_value])
        .context("CLIP text inference failed")?;

    let output_tensor = outputs[0]
        .try_extract_array::<f32>()
        .context("Failed to extract text embeddings")?;

    let embeddings = output_tensor
        .to_owned()
        .into_dimensionality::<Ix2>()
        .context("CLIP text encoder output is not [labels, dim]")?;
    Ok(embeddings)
}

impl SceneClassifier for ClipSceneClassifier {
    fn classify(&self, image: &DynamicImage) -> Result<SceneMatch> {
        let embedding = Array1::from(self.embed_image(image)?);
        let scene = select_scene(embedding.view(), self.text_embeddings.view(), &self.labels)?;

        debug!("Scene '{}' (p={:.3})", scene.label, scene.score);

        Ok(scene)
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}
