// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
//! Rendering detection overlays and encoding the result for transport

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::collections::HashSet;
use std::io::Cursor;
use thiserror::Error;

use super::detector::Detection;

/// Output resolution of the rendered visualization.
pub const OUTPUT_WIDTH: u32 = 832;
pub const OUTPUT_HEIGHT: u32 = 480;

/// Overlay box color
const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Border thickness in pixels
const BOX_THICKNESS: i32 = 2;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to encode visualization as PNG: {0}")]
    Png(#[from] image::ImageError),
}

/// Collect the unique labels across all detections. Duplicates are removed;
/// order is not guaranteed.
pub fn unique_labels(detections: &[Detection]) -> Vec<String> {
    let set: HashSet<&str> = detections.iter().map(|d| d.label.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Render the normalized image with detection overlays, resize to the
/// transport resolution, PNG-encode and base64-encode the result.
///
/// With zero detections the clean image still renders and encodes.
pub fn render_annotated(
    image: &RgbImage,
    detections: &[Detection],
) -> Result<String, EncodeError> {
    let mut canvas = image.clone();

    for det in detections {
        draw_box(&mut canvas, det);
    }

    let rendered = image::imageops::resize(
        &canvas,
        OUTPUT_WIDTH,
        OUTPUT_HEIGHT,
        FilterType::Triangle,
    );

    let mut png_bytes = Vec::new();
    image::DynamicImage::ImageRgb8(rendered)
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)?;

    Ok(STANDARD.encode(&png_bytes))
}

/// Draw one detection as a hollow rectangle with a fixed border thickness.
fn draw_box(canvas: &mut RgbImage, det: &Detection) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);

    let x1 = (det.bbox.x1.floor() as i32).clamp(0, width - 1);
    let y1 = (det.bbox.y1.floor() as i32).clamp(0, height - 1);
    let x2 = (det.bbox.x2.ceil() as i32).clamp(0, width - 1);
    let y2 = (det.bbox.y2.ceil() as i32).clamp(0, height - 1);

    if x1 >= x2 || y1 >= y2 {
        return;
    }

    for t in 0..BOX_THICKNESS {
        let bx = x1 + t;
        let by = y1 + t;
        let bw = (x2 - x1 - 2 * t).max(1) as u32;
        let bh = (y2 - y1 - 2 * t).max(1) as u32;
        draw_hollow_rect_mut(canvas, Rect::at(bx, by).of_size(bw, bh), BOX_COLOR);
    }
}
