// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
//! Detector weights loading with an ordered fallback chain
//!
//! Loading runs exactly once at process startup and is not part of the
//! request path. Each strategy is tried in order; the first success wins.
//! Non-final failures are logged, exhaustion aborts startup.

use anyhow::{Context, Result};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use std::path::Path;
use tracing::{info, warn};

/// One way of turning a weights file into a ready session.
struct LoadStrategy {
    name: &'static str,
    load: fn(&Path) -> Result<Session>,
}

/// Ordered fallback chain, preferred strategy first.
const STRATEGIES: &[LoadStrategy] = &[
    LoadStrategy {
        name: "strict",
        load: load_strict,
    },
    LoadStrategy {
        name: "two-phase",
        load: load_two_phase,
    },
    LoadStrategy {
        name: "legacy",
        load: load_legacy,
    },
];

/// Load the detector session from a local ONNX weights file.
///
/// # Errors
/// Returns an error when the weights file is missing or when every load
/// strategy in the chain has failed. Callers treat this as fatal.
pub fn load_model(model_path: &Path) -> Result<Session> {
    if !model_path.exists() {
        anyhow::bail!("Weights file not found: {}", model_path.display());
    }

    info!("Loading detector weights from {}", model_path.display());

    let mut last_err = None;
    for strategy in STRATEGIES {
        match (strategy.load)(model_path) {
            Ok(session) => {
                info!("Detector loaded via '{}' strategy", strategy.name);
                return Ok(session);
            }
            Err(e) => {
                warn!("Load strategy '{}' failed: {:#}", strategy.name, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| anyhow::anyhow!("no load strategies configured")))
    .context(format!(
        "All load strategies exhausted for {}",
        model_path.display()
    ))
}

/// Preferred path: full graph validation and optimization.
fn load_strict(model_path: &Path) -> Result<Session> {
    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(4)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .context("Failed to commit session from file")
}

/// Read the weights into memory first, then build the session from the
/// buffer. Surfaces I/O and truncation errors before the runtime parses
/// the graph, and requires the buffer to match the model structure exactly.
fn load_two_phase(model_path: &Path) -> Result<Session> {
    let bytes = std::fs::read(model_path)
        .with_context(|| format!("Failed to read weights file {}", model_path.display()))?;

    if bytes.is_empty() {
        anyhow::bail!("Weights file is empty: {}", model_path.display());
    }

    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .commit_from_memory(&bytes)
        .context("Failed to commit session from memory")
}

/// Last resort: no graph optimization at all, for models whose graphs
/// fail the optimizer.
fn load_legacy(model_path: &Path) -> Result<Session> {
    Session::builder()
        .context("Failed to create session builder")?
        .with_optimization_level(GraphOptimizationLevel::Disable)
        .context("Failed to set optimization level")?
        .commit_from_file(model_path)
        .context("Failed to commit session from file")
}
