// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for towline-core operations.

use thiserror::Error;

/// All possible errors that can occur in towline-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid VIN: expected 17 characters, got {len}\n  hint: rescan the barcode on the door jamb or windshield")]
    InvalidVin { len: usize },

    #[error("invalid photo type: '{0}'\n  hint: valid types are: front, rear, side, damage")]
    InvalidPhotoKind(String),

    #[error("invalid job status: '{0}'\n  hint: valid statuses are: pending, assigned, in_progress, completed, cancelled")]
    InvalidJobStatus(String),

    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("{0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for towline-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
