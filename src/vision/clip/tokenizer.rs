// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed-length tokenization for the CLIP text encoder

use anyhow::{Context, Result};
use ndarray::Array2;
use std::path::Path;
use tokenizers::Tokenizer;

/// Context length of the CLIP text tower
pub const CONTEXT_LENGTH: usize = 77;

/// Padding id used by the CLIP text tower
pub const PAD_ID: i64 = 0;

/// Wraps a `tokenizer.json` and packs encodings into `[batch, 77]` id tensors
pub struct ClipTokenizer {
    tokenizer: Tokenizer,
    context_length: usize,
}

impl std::fmt::Debug for ClipTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipTokenizer")
            .field("context_length", &self.context_length)
            .finish_non_exhaustive()
    }
}

impl ClipTokenizer {
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", path.display());
        }
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        Ok(Self {
            tokenizer,
            context_length: CONTEXT_LENGTH,
        })
    }

    /// Encode texts into a `[texts.len(), context_length]` id matrix
    pub fn encode_batch(&self, texts: &[&str]) -> Result<Array2<i64>> {
        let mut ids = Vec::with_capacity(texts.len() * self.context_length);
        for text in texts {
            let encoding = self
                .tokenizer
                .encode(*text, true)
                .map_err(|e| anyhow::anyhow!("Failed to tokenize '{}': {}", text, e))?;
            ids.extend(pack_ids(encoding.get_ids(), self.context_length));
        }
        Array2::from_shape_vec((texts.len(), self.context_length), ids)
            .context("Failed to create token id array")
    }
}

/// Pad or truncate ids to exactly `context_length`
///
/// On truncation the final slot keeps the last id of the encoding, which is
/// the end-of-text token the text tower pools on.
pub fn pack_ids(ids: &[u32], context_length: usize) -> Vec<i64> {
    let mut packed: Vec<i64> = ids
        .iter()
        .take(context_length)
        .map(|&id| id as i64)
        .collect();

    if ids.len() > context_length {
        if let (Some(slot), Some(&eot)) = (packed.last_mut(), ids.last()) {
            *slot = eot as i64;
        }
    }

    packed.resize(context_length, PAD_ID);
    packed
}
