// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image analysis pipeline
//!
//! Decodes an upload, labels it with the vision models, and asks the text
//! generator for a paragraph and a poem about the result.

pub mod analyzer;
pub mod prompts;

pub use analyzer::{AnalysisError, AnalysisReport, ImageAnalyzer, ImageLabels};
pub use prompts::{objects_phrase, paragraph_prompt, poem_prompt, UNKNOWN_OBJECT};
