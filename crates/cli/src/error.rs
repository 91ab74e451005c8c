// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{QueueError, SubmitError, TransportError};

/// All possible errors that can occur in the towline library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not logged in\n  hint: run 'towline login --token <TOKEN>' or set TOWLINE_TOKEN")]
    NotLoggedIn,

    #[error("device is offline\n  hint: queued operations are sent by 'towline drain' or 'towline watch' once the API is reachable")]
    Offline,

    #[error("invalid {field}: '{value}'\n  hint: {hint}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        hint: &'static str,
    },

    #[error("another drain is running for queue '{0}'")]
    AlreadyDraining(String),

    #[error("{0}")]
    Core(#[from] towline_core::Error),

    #[error("queue error: {0}")]
    Queue(QueueError),

    #[error("request failed: {0}")]
    Submit(#[from] SubmitError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for towline operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<QueueError> for Error {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::AlreadyDraining(name) => Error::AlreadyDraining(name),
            other => Error::Queue(other),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
