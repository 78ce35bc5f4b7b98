// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the chat service.
//!
//! Values are layered: built-in defaults, then an optional `paladin.toml`,
//! then `PALADIN_*` environment variables. Nested keys use `__`, for
//! example `PALADIN_RATE_LIMIT__MAX_REQUESTS=40`.

use ::config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Configuration for the chat service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// API rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Message store connection
    #[serde(default)]
    pub store: StoreConfig,

    /// Message payload limits
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Live message feed
    #[serde(default)]
    pub feed: FeedConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Sliding-window rate limiting applied to `/api/` routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window per client IP, 0 disables (default: 20)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between sweeps of idle client entries (default: 300)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,

    /// Key clients by the first `X-Forwarded-For` entry (default: false)
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

/// SurrealDB connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Engine endpoint: `mem://`, `rocksdb://<path>` or `ws://<host>:<port>`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_database")]
    pub database: String,

    /// Root credentials for remote engines
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,

    /// Messages returned by a history fetch (default: 50)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Limits enforced on submitted messages and mirrored by the client UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum author length in characters (default: 50)
    #[serde(default = "default_author_max_chars")]
    pub author_max_chars: usize,

    /// Maximum content length in characters (default: 500)
    #[serde(default = "default_content_max_chars")]
    pub content_max_chars: usize,
}

/// Broadcast settings for the live message feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Messages buffered per subscriber before it starts skipping (default: 128)
    #[serde(default = "default_feed_capacity")]
    pub capacity: usize,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    20
}

fn default_window_secs() -> u64 {
    60
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

fn default_endpoint() -> String {
    "mem://".to_string()
}

fn default_namespace() -> String {
    "paladin".to_string()
}

fn default_database() -> String {
    "chat".to_string()
}

fn default_history_limit() -> usize {
    50
}

fn default_author_max_chars() -> usize {
    50
}

fn default_content_max_chars() -> usize {
    500
}

fn default_feed_capacity() -> usize {
    128
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            store: StoreConfig::default(),
            validation: ValidationConfig::default(),
            feed: FeedConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            trust_forwarded_for: false,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            namespace: default_namespace(),
            database: default_database(),
            username: None,
            password: None,
            history_limit: default_history_limit(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            author_max_chars: default_author_max_chars(),
            content_max_chars: default_content_max_chars(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: default_feed_capacity(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Config {
    /// Load configuration from `paladin.toml` (optional) and `PALADIN_*`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config: Self = ::config::Config::builder()
            .add_source(File::with_name("paladin").required(false))
            .add_source(
                Environment::with_prefix("PALADIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if !config.metrics.path.starts_with('/') {
            warn!(path = %config.metrics.path, "Metrics path must start with '/', using default");
            config.metrics.path = default_metrics_path();
        }

        Ok(config)
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the idle-entry sweep interval
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl StoreConfig {
    /// Root credentials, when both halves are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}
