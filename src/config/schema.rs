//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dev
//! server. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the dev server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DevServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Forwarding rules, evaluated in order; the first match wins.
    pub rules: Vec<RuleConfig>,

    /// Local asset serving for requests no rule claims.
    pub static_files: StaticFilesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5173").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5173".to_string(),
        }
    }
}

/// A single forwarding rule descriptor.
///
/// Fixed for the process lifetime: rules are compiled once at startup and
/// never mutated while the server runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Rule identifier for logging/metrics.
    pub name: String,

    /// Literal path prefix to match (e.g., "/api").
    pub path_prefix: String,

    /// Destination origin: scheme + host + port (e.g., "http://127.0.0.1:8000").
    pub target: String,

    /// Rewrite the outbound `Host` header to the target's authority.
    #[serde(default)]
    pub change_origin: bool,

    /// Literal to strip once from the front of matched paths before
    /// forwarding. Must itself be a prefix of `path_prefix`. When omitted,
    /// the path is forwarded unchanged.
    #[serde(default)]
    pub strip_prefix: Option<String>,
}

/// Local asset serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory holding the frontend build output.
    pub root: PathBuf,

    /// Index document, relative to `root`.
    pub index: String,

    /// Serve the index document for paths that miss the filesystem, so
    /// client-side routes resolve on hard reload.
    pub spa: bool,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dist"),
            index: "index.html".to_string(),
            spa: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) used when RUST_LOG is
    /// not set.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
