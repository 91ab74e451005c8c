// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for HTTP communication with the fleet API.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP connections for production (reqwest)
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;

/// Boxed future returned by transport and submit functions.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for transport operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection failed or was reset.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// Base URL or path could not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// HTTP method used by the fleet API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request to the fleet API, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(path: &str, bearer: Option<String>) -> Self {
        HttpRequest {
            method: Method::Get,
            path: path.to_string(),
            bearer,
            body: None,
        }
    }

    pub fn post(path: &str, bearer: Option<String>, body: Value) -> Self {
        HttpRequest {
            method: Method::Post,
            path: path.to_string(),
            bearer,
            body: Some(body),
        }
    }
}

/// Status and parsed body of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// JSON body, if the response had one that parsed.
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for request/response communication.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync {
    /// Send a request and wait for the response.
    ///
    /// Non-2xx responses are returned as `Ok`; only failures to get a
    /// response at all are errors.
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult<HttpResponse>>;

    /// Base URL requests are resolved against.
    fn base_url(&self) -> &str;
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> TransportResult<Self> {
        reqwest::Url::parse(base_url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(HttpTransport {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult<HttpResponse>> {
        Box::pin(async move {
            let url = format!("{}{}", self.base_url, request.path);
            let mut builder = match request.method {
                Method::Get => self.client.get(&url),
                Method::Post => self.client.post(&url),
            };
            if let Some(token) = &request.bearer {
                builder = builder.bearer_auth(token);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(classify)?;
            let status = response.status().as_u16();
            let text = response.text().await.map_err(classify)?;
            let body = if text.trim().is_empty() {
                None
            } else {
                serde_json::from_str(&text).ok()
            };

            Ok(HttpResponse { status, body })
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::InvalidUrl(e.to_string())
    } else {
        TransportError::ConnectionFailed(e.to_string())
    }
}
