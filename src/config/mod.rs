//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! aikefu-web.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DevConfig (validated, immutable)
//!     → proxy table, static root, alias resolver
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps in the new proxy table
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults; an empty file reproduces the stock setup
//! - Validation separates syntactic (serde) from semantic checks

pub mod alias;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use alias::AliasResolver;
pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    DevConfig, LogFormat, ObservabilityConfig, ProxyRuleConfig, RewriteConfig, ServerConfig,
    TimeoutConfig,
};
