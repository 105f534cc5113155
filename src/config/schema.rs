//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dev server.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file reproduces the stock setup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the dev server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DevConfig {
    /// Listener and static-serving settings.
    pub server: ServerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Path-prefix reverse proxy rules, checked in declaration order.
    pub proxy: Vec<ProxyRuleConfig>,

    /// Module resolution settings.
    pub resolve: ResolveConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            timeouts: TimeoutConfig::default(),
            proxy: vec![ProxyRuleConfig::default()],
            resolve: ResolveConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener and static-serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5173").
    pub bind_address: String,

    /// Public base path the app is served under.
    pub base: String,

    /// Client project root (holds index.html and the source tree).
    pub root_dir: String,

    /// Host document served for history-mode deep links.
    pub index_file: String,

    /// Element the client mounts onto.
    pub mount_selector: String,

    /// Answer unmatched client paths with 404 instead of 200.
    pub not_found_status: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5173".to_string(),
            base: "/".to_string(),
            root_dir: ".".to_string(),
            index_file: "index.html".to_string(),
            mount_selector: crate::app::DEFAULT_MOUNT_SELECTOR.to_string(),
            not_found_status: false,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// One reverse proxy rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyRuleConfig {
    /// Request path prefix that selects this rule.
    pub prefix: String,

    /// Upstream origin, optionally with a path prefix.
    pub target: String,

    /// Rewrite the Host header to the target authority.
    pub change_origin: bool,

    /// Optional literal prefix rewrite applied before forwarding.
    pub rewrite: Option<RewriteConfig>,
}

impl Default for ProxyRuleConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            target: "http://localhost:8080".to_string(),
            change_origin: true,
            rewrite: None,
        }
    }
}

/// Literal path prefix replacement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RewriteConfig {
    pub from: String,
    #[serde(default)]
    pub to: String,
}

/// Module resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Import alias → directory, relative to `server.root_dir`.
    pub alias: BTreeMap<String, String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        let mut alias = BTreeMap::new();
        alias.insert("@".to_string(), "./src".to_string());
        Self { alias }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
