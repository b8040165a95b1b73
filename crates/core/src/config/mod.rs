//! Configuration: TOML file + environment overrides.

mod loader;
mod types;
mod validate;

use thiserror::Error;

pub use loader::{load_config, load_config_from_str};
pub use types::{
    AuthConfig, AuthMethod, Config, DatabaseConfig, GeneratorConfig, MediaConfig,
    PublisherConfig, SanitizedConfig, ServerConfig, StorageConfig,
};
pub use validate::validate_config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
