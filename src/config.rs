// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
//! Node configuration from environment variables with code defaults

use std::env;
use std::path::PathBuf;

use crate::vision::DEFAULT_CONFIDENCE_THRESHOLD;

/// Default listen port, matching the observed deployment.
const DEFAULT_API_PORT: u16 = 8000;

/// Default local weights path, read once at startup.
const DEFAULT_MODEL_PATH: &str = "./static/best.onnx";

/// Runtime configuration for the node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Port the HTTP listener binds to
    pub api_port: u16,
    /// Local path to the ONNX weights file
    pub model_path: PathBuf,
    /// Minimum confidence for a detection to be reported
    pub confidence_threshold: f32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_port: DEFAULT_API_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl NodeConfig {
    /// Build configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.api_port);

        let model_path = env::var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);

        let confidence_threshold = env::var("CONFIDENCE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(defaults.confidence_threshold);

        Self {
            api_port,
            model_path,
            confidence_threshold,
        }
    }
}
