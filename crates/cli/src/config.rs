// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device configuration management.
//!
//! Configuration is stored in `<state_dir>/config.toml`. Every field has a
//! default, so a missing file or a partial file is valid:
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.com"
//! timeout_secs = 15
//!
//! [connectivity]
//! probe_interval_ms = 5000
//! probe_timeout_ms = 2000
//!
//! [queue]
//! persist = true
//! dead_letter_permanent = true
//! max_attempts = 20
//!
//! [retry]
//! initial_delay_ms = 500
//! max_delay_secs = 60
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};
use crate::sync::{DrainPolicy, FailurePolicy};

const CONFIG_FILE_NAME: &str = "config.toml";
const TOKEN_FILE_NAME: &str = "token";
const QUEUE_DIR_NAME: &str = "queues";
const LOG_FILE_NAME: &str = "towline.log";

/// Device configuration stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Fleet API endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoints are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Connectivity probing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// How often `watch` probes the network.
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    /// How long a probe waits for the API host to accept a connection.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

/// Retry queue settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Keep queues on disk under `<state_dir>/queues`.
    #[serde(default = "default_true")]
    pub persist: bool,
    /// Dead-letter operations the API rejects permanently. When false every
    /// failure is retried.
    #[serde(default = "default_true")]
    pub dead_letter_permanent: bool,
    /// Dead-letter an operation after this many retryable failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

/// Backoff between drain retries while connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_probe_interval_ms() -> u64 {
    5_000
}

fn default_probe_timeout_ms() -> u64 {
    2_000
}

fn default_true() -> bool {
    true
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_secs() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig {
            probe_interval_ms: default_probe_interval_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            persist: true,
            dead_letter_permanent: true,
            max_attempts: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl ConnectivityConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms.max(100))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms.max(1))
    }
}

impl QueueConfig {
    /// Drain policy for every screen queue.
    pub fn drain_policy(&self) -> DrainPolicy {
        DrainPolicy {
            failure: if self.dead_letter_permanent {
                FailurePolicy::DeadLetterPermanent
            } else {
                FailurePolicy::HaltOnAny
            },
            max_attempts: self.max_attempts.filter(|n| *n > 0),
        }
    }
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms.max(1))
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs).max(self.initial_delay())
    }
}

impl Config {
    /// Loads configuration from `state_dir`, falling back to defaults when
    /// the file does not exist.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Saves configuration to `state_dir`.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        fs::create_dir_all(state_dir)?;
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Apply an API URL override, e.g. from `TOWLINE_API_URL`.
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.api.base_url = url;
        }
        self
    }

    /// Validates fields that have no safe default.
    pub fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "invalid api.base_url '{}': must start with http:// or https://",
                url
            )));
        }
        Ok(())
    }
}

/// Resolve the state directory from its possible sources, in priority order.
pub fn resolve_state_dir(
    explicit: Option<PathBuf>,
    xdg_state_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Some(xdg) = xdg_state_home {
        return Ok(xdg.join("towline"));
    }
    home.map(|h| h.join(".local").join("state").join("towline"))
        .ok_or_else(|| Error::Config("cannot determine state directory: set TOWLINE_STATE_DIR".into()))
}

/// The state directory for this process, from `TOWLINE_STATE_DIR`,
/// `XDG_STATE_HOME` or the home directory.
pub fn state_dir() -> Result<PathBuf> {
    resolve_state_dir(env::state_dir(), env::xdg_state_home(), dirs::home_dir())
}

/// Path of the session token file.
pub fn token_path(state_dir: &Path) -> PathBuf {
    state_dir.join(TOKEN_FILE_NAME)
}

/// Directory holding durable queues.
pub fn queue_dir(state_dir: &Path) -> PathBuf {
    state_dir.join(QUEUE_DIR_NAME)
}

/// Log file written by `watch`.
pub fn log_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
