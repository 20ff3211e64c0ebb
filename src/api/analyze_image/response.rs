// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze image response types

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisReport;

/// Successful analysis of one image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeImageResponse {
    /// Unique detected object labels
    pub objects: Vec<String>,
    /// One of the fixed scene labels
    pub scenery: String,
    /// Generated paragraph, or an inline generation error
    pub description: String,
    /// Generated poem, or an inline generation error
    pub poem: String,
}

impl From<AnalysisReport> for AnalyzeImageResponse {
    fn from(report: AnalysisReport) -> Self {
        Self {
            objects: report.objects,
            scenery: report.scenery,
            description: report.description,
            poem: report.poem,
        }
    }
}
