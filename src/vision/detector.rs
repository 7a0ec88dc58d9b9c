// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
//! Detector wrapping the loaded ONNX session
//!
//! One normalized image in, one set of detections out. The session is
//! loaded once at startup and shared read-only across requests; inference
//! itself is serialized behind a mutex because `Session::run` needs
//! exclusive access.

use anyhow::{Context, Result};
use image::RgbImage;
use ndarray::{Array4, ArrayViewD};
use ort::session::Session;
use ort::value::Value;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::image_utils::NORMALIZED_SIZE;
use super::labels::resolve_labels;
use super::loader::load_model;

/// Default confidence threshold for keeping a prediction.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// IoU threshold for non-maximum suppression.
const IOU_THRESHOLD: f32 = 0.45;

/// Axis-aligned bounding box in pixel coordinates of the normalized image.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// IoU (intersection over union) with another box.
    pub fn iou(&self, other: &BBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        let union = self.width() * self.height() + other.width() * other.height() - inter;
        inter / union
    }
}

/// One predicted object instance.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// Label drawn from the model's fixed vocabulary
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Bounding box in normalized-image pixel coordinates
    pub bbox: BBox,
}

/// Object detector backed by a YOLOv5-family ONNX export.
pub struct Detector {
    /// ONNX Runtime session (inference is serialized)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Class index -> label name
    labels: Vec<String>,
    /// Confidence threshold for detections
    confidence_threshold: f32,
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("input_name", &self.input_name)
            .field("labels", &self.labels)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish_non_exhaustive()
    }
}

impl Detector {
    /// Load the detector from a local ONNX weights file.
    ///
    /// Runs the loader's fallback chain; a failure here is fatal to
    /// startup, the process must not begin serving requests without a
    /// ready handle.
    pub fn load(model_path: &Path) -> Result<Self> {
        let session = load_model(model_path)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        let labels = resolve_labels(&session);

        debug!(
            "Detector ready - input: {}, {} classes",
            input_name,
            labels.len()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            labels,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        })
    }

    /// Set the confidence threshold for detections
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Label vocabulary of the loaded model.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Run inference on one normalized 640x640 RGB image.
    ///
    /// Deterministic for a given image and model. Returns detections with
    /// labels, confidence scores and pixel-space boxes after NMS.
    pub fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>> {
        if image.dimensions() != (NORMALIZED_SIZE, NORMALIZED_SIZE) {
            anyhow::bail!(
                "Detector input must be {0}x{0}, got {1}x{2}",
                NORMALIZED_SIZE,
                image.width(),
                image.height()
            );
        }

        let input = to_input_tensor(image);

        let candidates = {
            let mut session = self.session.lock().unwrap();

            let input_value =
                Value::from_array(input).context("Failed to create input tensor")?;

            let outputs = session
                .run(ort::inputs![&self.input_name => input_value])
                .context("Detector inference failed")?;

            let output = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract output tensor")?;

            decode_predictions(&output.view(), &self.labels, self.confidence_threshold)?
        };

        let detections = nms(candidates, IOU_THRESHOLD);
        debug!("{} detections after NMS", detections.len());

        Ok(detections)
    }
}

/// Convert a normalized RGB image into an NCHW float tensor scaled to [0,1].
fn to_input_tensor(image: &RgbImage) -> Array4<f32> {
    let (width, height) = image.dimensions();
    let mut tensor = Array4::<f32>::zeros((1, 3, height as usize, width as usize));

    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    tensor
}

/// Decode raw YOLOv5 output rows into detection candidates.
///
/// Expected layout is `[1, N, 5 + num_classes]` where each row is
/// `cx, cy, w, h, objectness, class scores...`. Confidence is objectness
/// times the best class score; boxes are clamped to the input frame.
fn decode_predictions(
    output: &ArrayViewD<f32>,
    labels: &[String],
    threshold: f32,
) -> Result<Vec<Detection>> {
    let shape = output.shape();
    if shape.len() != 3 || shape[0] != 1 || shape[2] < 6 {
        anyhow::bail!(
            "Unexpected detector output shape: {:?}, expected [1, N, 5 + classes]",
            shape
        );
    }

    let rows = shape[1];
    let num_classes = shape[2] - 5;
    let frame = NORMALIZED_SIZE as f32;

    let mut candidates = Vec::new();

    for i in 0..rows {
        let objectness = output[[0, i, 4]];
        if objectness < threshold {
            continue;
        }

        let mut best_class = 0usize;
        let mut best_score = 0f32;
        for c in 0..num_classes {
            let score = output[[0, i, 5 + c]];
            if score > best_score {
                best_score = score;
                best_class = c;
            }
        }

        let confidence = objectness * best_score;
        if confidence < threshold {
            continue;
        }

        let cx = output[[0, i, 0]];
        let cy = output[[0, i, 1]];
        let w = output[[0, i, 2]];
        let h = output[[0, i, 3]];

        let bbox = BBox {
            x1: (cx - w / 2.0).clamp(0.0, frame),
            y1: (cy - h / 2.0).clamp(0.0, frame),
            x2: (cx + w / 2.0).clamp(0.0, frame),
            y2: (cy + h / 2.0).clamp(0.0, frame),
        };

        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            continue;
        }

        let label = labels
            .get(best_class)
            .cloned()
            .unwrap_or_else(|| format!("class_{}", best_class));

        candidates.push(Detection {
            label,
            confidence,
            bbox,
        });
    }

    Ok(candidates)
}

/// Greedy non-maximum suppression, highest confidence first.
fn nms(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    'candidates: for det in candidates {
        for k in &kept {
            if k.bbox.iou(&det.bbox) > iou_threshold {
                continue 'candidates;
            }
        }
        kept.push(det);
    }

    kept
}
