// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX Runtime session construction shared by the detector and the embedder

use anyhow::{Context, Result};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// Which execution provider a session ended up on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionDevice {
    Cuda,
    Cpu,
}

impl std::fmt::Display for ExecutionDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionDevice::Cuda => write!(f, "cuda"),
            ExecutionDevice::Cpu => write!(f, "cpu"),
        }
    }
}

/// A loaded ONNX session plus the names of its first input and output
///
/// `Session::run` takes `&mut self` in ort 2.0, so the session sits behind a
/// mutex. Weights are never modified after load.
#[derive(Clone)]
pub struct OnnxSession {
    session: Arc<Mutex<Session>>,
    pub input_name: String,
    pub output_name: String,
    pub device: ExecutionDevice,
}

impl std::fmt::Debug for OnnxSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxSession")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl OnnxSession {
    /// Load a model file, trying CUDA first and falling back to CPU
    pub fn load(model_path: &Path, label: &str) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("{} model not found: {}", label, model_path.display());
        }

        info!("Loading {} model from {}", label, model_path.display());

        let cuda_result = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .context("Failed to set CUDA execution provider")
            .and_then(|b| {
                b.with_optimization_level(GraphOptimizationLevel::Level3)
                    .context("Failed to set optimization level")
            })
            .and_then(|b| b.commit_from_file(model_path).map_err(anyhow::Error::from));

        let (session, device) = match cuda_result {
            Ok(s) => (s, ExecutionDevice::Cuda),
            Err(e) => {
                warn!("CUDA execution provider unavailable for {}: {}", label, e);
                warn!("   Falling back to CPU execution provider");
                let s = Session::builder()
                    .context("Failed to create session builder")?
                    .with_execution_providers([CPUExecutionProvider::default().build()])
                    .context("Failed to set CPU execution provider")?
                    .with_optimization_level(GraphOptimizationLevel::Level3)
                    .context("Failed to set optimization level")?
                    .with_intra_threads(4)
                    .context("Failed to set intra threads")?
                    .commit_from_file(model_path)
                    .with_context(|| {
                        format!("Failed to load {} model from {}", label, model_path.display())
                    })?;
                (s, ExecutionDevice::Cpu)
            }
        };

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .context("model declares no inputs")?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .context("model declares no outputs")?;

        info!(
            "✅ {} model loaded on {} (input: {}, output: {})",
            label, device, input_name, output_name
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
            device,
        })
    }

    /// Lock the session for a single inference call
    pub fn lock(&self) -> Result<MutexGuard<'_, Session>> {
        self.session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session mutex poisoned"))
    }
}
