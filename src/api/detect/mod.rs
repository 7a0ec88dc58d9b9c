// Copyright (c) 2025 Sightline
// SPDX-License-Identifier: MIT
pub mod handler;
pub mod response;

pub use handler::detect_handler;
pub use response::{DetectResponse, ImagePayload};
