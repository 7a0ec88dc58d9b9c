// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
//! Detection pipeline: decode, infer, render

pub mod annotate;
pub mod detector;
pub mod image_utils;
pub mod labels;
pub mod loader;

pub use annotate::{render_annotated, unique_labels, EncodeError};
pub use detector::{BBox, Detection, Detector, DEFAULT_CONFIDENCE_THRESHOLD};
pub use image_utils::{decode_to_normalized, ImageError, ImageInfo, NORMALIZED_SIZE};
pub use labels::DEFAULT_LABELS;
