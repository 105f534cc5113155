//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting proxy rules
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DevConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::app::MountPoint;
use crate::config::schema::DevConfig;
use crate::proxy::rule::HTTP_ONLY;

/// A single semantic problem in a config file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("server.base {0:?} must start with '/'")]
    Base(String),

    #[error("server.index_file must not be empty")]
    IndexFile,

    #[error("server.mount_selector {0:?} must be an id selector like #app")]
    MountSelector(String),

    #[error("timeouts.{0} must be greater than zero")]
    Timeout(&'static str),

    #[error("proxy prefix {0:?} must start with '/'")]
    ProxyPrefix(String),

    #[error("proxy prefix {0:?} declared more than once")]
    DuplicateProxyPrefix(String),

    #[error("proxy target {target:?}: {reason}")]
    ProxyTarget { target: String, reason: String },

    #[error("proxy rewrite for {0:?} must start from '/'")]
    ProxyRewrite(String),

    #[error("resolve.alias keys must not be empty")]
    EmptyAlias,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DevConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let server = &config.server;
    if server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(server.bind_address.clone()));
    }
    if !server.base.starts_with('/') {
        errors.push(ValidationError::Base(server.base.clone()));
    }
    if server.index_file.trim().is_empty() {
        errors.push(ValidationError::IndexFile);
    }
    if MountPoint::parse(&server.mount_selector).is_err() {
        errors.push(ValidationError::MountSelector(server.mount_selector.clone()));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Timeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Timeout("request_secs"));
    }

    let mut prefixes = HashSet::new();
    for rule in &config.proxy {
        if !rule.prefix.starts_with('/') {
            errors.push(ValidationError::ProxyPrefix(rule.prefix.clone()));
        }
        if !prefixes.insert(rule.prefix.as_str()) {
            errors.push(ValidationError::DuplicateProxyPrefix(rule.prefix.clone()));
        }
        if let Err(reason) = check_target(&rule.target) {
            errors.push(ValidationError::ProxyTarget {
                target: rule.target.clone(),
                reason,
            });
        }
        if let Some(rewrite) = &rule.rewrite {
            if !rewrite.from.starts_with('/') {
                errors.push(ValidationError::ProxyRewrite(rule.prefix.clone()));
            }
        }
    }

    if config.resolve.alias.keys().any(|k| k.trim().is_empty()) {
        errors.push(ValidationError::EmptyAlias);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_target(target: &str) -> Result<(), String> {
    let url = Url::parse(target).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("{} (got {}://)", HTTP_ONLY, url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("query and fragment are not allowed".to_string());
    }
    Ok(())
}
