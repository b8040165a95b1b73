use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
    #[serde(default)]
    pub publisher: Option<PublisherConfig>,
    #[serde(default)]
    pub media: Option<MediaConfig>,
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    /// Required when method = "api_key"
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    None,
    ApiKey,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("soapbox.db")
}

/// Draft generator (LLM) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// LLM provider (only "openai"-compatible endpoints for now)
    #[serde(default = "default_provider")]
    pub provider: String,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for OpenAI-compatible proxies
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Publish webhook configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublisherConfig {
    /// Automation webhook URL (e.g. a Make scenario)
    pub webhook_url: String,
    pub api_key: String,
    /// Request timeout in seconds (default: 90 - the automation posts to
    /// social platforms synchronously before answering)
    #[serde(default = "default_publisher_timeout")]
    pub timeout_secs: u32,
}

fn default_publisher_timeout() -> u32 {
    90
}

/// Media generation webhook configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub webhook_url: String,
    pub api_key: String,
    #[serde(default = "default_media_timeout")]
    pub timeout_secs: u32,
}

fn default_media_timeout() -> u32 {
    120
}

/// Object storage configuration (S3-compatible gateway)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Upload endpoint
    pub endpoint: String,
    pub api_key: String,
    /// Base of the public URLs returned for stored objects
    pub public_base: String,
}

// ============================================================================
// Sanitized views (secrets redacted) for the /config endpoint
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<SanitizedGeneratorConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<SanitizedPublisherConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<SanitizedMediaConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<SanitizedStorageConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
    pub api_key_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGeneratorConfig {
    pub provider: String,
    pub model: String,
    pub api_key_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPublisherConfig {
    pub webhook_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMediaConfig {
    pub webhook_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub endpoint: String,
    pub public_base: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: match config.auth.method {
                    AuthMethod::None => "none".to_string(),
                    AuthMethod::ApiKey => "api_key".to_string(),
                },
                api_key_configured: config.auth.api_key.is_some(),
            },
            server: config.server.clone(),
            database: config.database.clone(),
            generator: config.generator.as_ref().map(|g| SanitizedGeneratorConfig {
                provider: g.provider.clone(),
                model: g.model.clone(),
                api_key_configured: !g.api_key.is_empty(),
            }),
            publisher: config.publisher.as_ref().map(|p| SanitizedPublisherConfig {
                webhook_url: p.webhook_url.clone(),
                api_key_configured: !p.api_key.is_empty(),
                timeout_secs: p.timeout_secs,
            }),
            media: config.media.as_ref().map(|m| SanitizedMediaConfig {
                webhook_url: m.webhook_url.clone(),
                api_key_configured: !m.api_key.is_empty(),
                timeout_secs: m.timeout_secs,
            }),
            storage: config.storage.as_ref().map(|s| SanitizedStorageConfig {
                endpoint: s.endpoint.clone(),
                public_base: s.public_base.clone(),
                api_key_configured: !s.api_key.is_empty(),
            }),
        }
    }
}
