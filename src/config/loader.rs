//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DevConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DevConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<DevConfig, ConfigError> {
    let config: DevConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load from `path` when given, otherwise fall back to defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<DevConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = DevConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:5173");
        assert_eq!(config.server.mount_selector, "#app");
        assert_eq!(config.proxy.len(), 1);
        assert_eq!(config.proxy[0].prefix, "/api");
        assert_eq!(config.proxy[0].target, "http://localhost:8080");
        assert!(config.proxy[0].change_origin);
        assert!(config.proxy[0].rewrite.is_none());
        assert_eq!(config.resolve.alias.get("@").map(String::as_str), Some("./src"));
    }

    #[test]
    fn test_parse_full_file() {
        let config = parse_config(
            r#"
            [server]
            bind_address = "0.0.0.0:3000"
            base = "/app/"
            not_found_status = true

            [[proxy]]
            prefix = "/api"
            target = "http://127.0.0.1:9000/backend"
            change_origin = false
            rewrite = { from = "/api", to = "" }

            [resolve.alias]
            "@" = "./src"
            "~assets" = "./src/assets"

            [observability]
            log_level = "debug"
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base, "/app/");
        assert!(config.server.not_found_status);
        assert!(!config.proxy[0].change_origin);
        assert_eq!(config.proxy[0].rewrite.as_ref().unwrap().from, "/api");
        assert_eq!(config.resolve.alias.len(), 2);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_config("[server\nbind_address = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_reported() {
        let err = parse_config("[server]\nbind_address = \"nope\"").unwrap_err();
        let ConfigError::Validation(errors) = &err else {
            panic!("expected validation error, got {err}");
        };
        assert_eq!(errors.len(), 1);
        assert!(err.to_string().contains("bind_address"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/aikefu-web.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
