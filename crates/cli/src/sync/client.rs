// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Submission client for the fleet API.
//!
//! Provides a high-level interface for:
//! - Posting each [`Operation`] to its endpoint with the session token
//! - Classifying failures as retryable or permanent
//! - Reading the driver and vehicle lists and verifying the session

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use towline_core::Operation;

use super::queue::Retryable;
use super::transport::{HttpRequest, HttpTransport, Transport, TransportError, TransportResult};
use crate::auth::CredentialProvider;

/// Error type for submissions and reads.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmitError {
    /// The device was offline when the attempt was due.
    #[error("device is offline")]
    Offline,

    /// No session token is stored.
    #[error("not logged in")]
    MissingCredential,

    /// No response was received.
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The API answered with a non-2xx status.
    #[error("server returned {status}{}", body_suffix(.body))]
    Server { status: u16, body: Option<Value> },

    /// The payload could not be encoded.
    #[error("could not encode request: {0}")]
    Encode(String),

    /// A read endpoint returned a body of the wrong shape.
    #[error("unexpected response body from {0}")]
    Decode(String),
}

fn body_suffix(body: &Option<Value>) -> String {
    match body {
        Some(b) => format!(": {b}"),
        None => String::new(),
    }
}

impl SubmitError {
    /// Whether the failure came with a structured response body.
    pub fn has_response_body(&self) -> bool {
        matches!(self, SubmitError::Server { body: Some(_), .. })
    }
}

impl Retryable for SubmitError {
    fn is_retryable(&self) -> bool {
        match self {
            SubmitError::Offline | SubmitError::MissingCredential | SubmitError::Network(_) => true,
            SubmitError::Server { status, .. } => {
                *status >= 500 || matches!(status, 401 | 408 | 429)
            }
            SubmitError::Encode(_) | SubmitError::Decode(_) => false,
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            SubmitError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for submission client operations.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Posts operations to the fleet API.
pub struct SubmissionClient<T: Transport = HttpTransport> {
    transport: T,
    credentials: Arc<dyn CredentialProvider>,
}

impl SubmissionClient<HttpTransport> {
    /// Create a client for `base_url` using the reqwest transport.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        credentials: Arc<dyn CredentialProvider>,
    ) -> TransportResult<Self> {
        let transport = HttpTransport::new(base_url, timeout)?;
        Ok(SubmissionClient {
            transport,
            credentials,
        })
    }
}

impl<T: Transport> SubmissionClient<T> {
    /// Create a client with a custom transport (for testing).
    pub fn with_transport(transport: T, credentials: Arc<dyn CredentialProvider>) -> Self {
        SubmissionClient {
            transport,
            credentials,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the credential provider currently has a token.
    pub fn has_credential(&self) -> bool {
        self.credentials.bearer_token().is_some()
    }

    fn token(&self) -> SubmitResult<String> {
        self.credentials
            .bearer_token()
            .ok_or(SubmitError::MissingCredential)
    }

    /// Post `op` to its endpoint.
    ///
    /// Returns the response body on 2xx.
    pub async fn submit(&self, op: &Operation) -> SubmitResult<Option<Value>> {
        let kind = op.kind();
        let token = self.token()?;
        let body = op.body().map_err(|e| SubmitError::Encode(e.to_string()))?;

        let result = self.send(HttpRequest::post(op.endpoint(), Some(token), body)).await;
        match &result {
            Ok(_) => tracing::info!(kind = %kind, "submitted operation"),
            Err(e) => tracing::warn!(
                kind = %kind,
                status = ?e.status(),
                has_body = e.has_response_body(),
                error = %e,
                "submission failed"
            ),
        }
        result
    }

    /// GET `path` and return its JSON body.
    pub async fn get_json(&self, path: &str) -> SubmitResult<Value> {
        let token = self.token()?;
        let body = self.send(HttpRequest::get(path, Some(token))).await?;
        Ok(body.unwrap_or(Value::Null))
    }

    /// Drivers available for assignment.
    pub async fn list_drivers(&self) -> SubmitResult<Vec<Value>> {
        let body = self.get_json("/drivers").await?;
        into_list("/drivers", body)
    }

    /// Vehicles in the fleet.
    pub async fn list_vehicles(&self) -> SubmitResult<Vec<Value>> {
        let body = self.get_json("/fleet/vehicles").await?;
        into_list("/fleet/vehicles", body)
    }

    /// Check the stored token against the API.
    pub async fn verify_session(&self) -> SubmitResult<Value> {
        self.get_json("/auth/verify").await
    }

    async fn send(&self, request: HttpRequest) -> SubmitResult<Option<Value>> {
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(SubmitError::Server {
                status: response.status,
                body: response.body,
            })
        }
    }
}

/// Accept either a bare array or `{"data": [...]}`.
fn into_list(path: &str, body: Value) -> SubmitResult<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(SubmitError::Decode(path.to_string())),
        },
        _ => Err(SubmitError::Decode(path.to_string())),
    }
}
