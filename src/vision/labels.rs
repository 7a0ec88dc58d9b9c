// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
//! Label vocabulary for the loaded detector
//!
//! Ultralytics ONNX exports carry the class map in the model metadata under
//! the `names` key, either as JSON or as a Python dict repr like
//! `{0: 'face'}`. When the metadata is missing or unreadable we fall back
//! to the single-class vocabulary the bundled weights were trained with.

use ort::session::Session;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// Vocabulary used when the model carries no usable `names` metadata.
pub const DEFAULT_LABELS: &[&str] = &["face"];

/// Resolve the label vocabulary for a loaded session.
pub fn resolve_labels(session: &Session) -> Vec<String> {
    match labels_from_metadata(session) {
        Some(labels) => {
            debug!("Label vocabulary from model metadata: {:?}", labels);
            labels
        }
        None => {
            debug!("No usable 'names' metadata, using default vocabulary");
            DEFAULT_LABELS.iter().map(|s| s.to_string()).collect()
        }
    }
}

/// Read and parse the `names` metadata entry, if present.
fn labels_from_metadata(session: &Session) -> Option<Vec<String>> {
    let metadata = session.metadata().ok()?;
    let raw = metadata.custom("names").ok().flatten()?;
    parse_names_map(&raw)
}

/// Parse a class map out of either JSON (`{"0": "face"}`) or Python dict
/// repr (`{0: 'face'}`) form. Returns labels ordered by class index; gaps
/// are filled with `class_<i>` placeholders.
fn parse_names_map(raw: &str) -> Option<Vec<String>> {
    // Matches `0: 'face'`, `"0": "face"` and `0: "face"` entries alike.
    let re = Regex::new(r#"["']?(\d+)["']?\s*:\s*["']([^"']*)["']"#).ok()?;

    let mut by_index = BTreeMap::new();
    for cap in re.captures_iter(raw) {
        let index: usize = cap[1].parse().ok()?;
        by_index.insert(index, cap[2].to_string());
    }

    let max_index = *by_index.keys().max()?;
    Some(
        (0..=max_index)
            .map(|i| {
                by_index
                    .get(&i)
                    .cloned()
                    .unwrap_or_else(|| format!("class_{}", i))
            })
            .collect(),
    )
}
