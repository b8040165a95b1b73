//! Startup configuration validation.

use super::types::{AuthMethod, Config};
use super::ConfigError;

/// Validate a loaded configuration before wiring anything up.
///
/// Catches the misconfigurations that would otherwise surface as confusing
/// runtime failures on the first request.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.auth.method == AuthMethod::ApiKey {
        match config.auth.api_key.as_deref() {
            None | Some("") => {
                return Err(ConfigError::Invalid(
                    "auth.api_key is required when auth.method = \"api_key\"".to_string(),
                ))
            }
            _ => {}
        }
    }

    if let Some(ref generator) = config.generator {
        if generator.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "generator.api_key must not be empty".to_string(),
            ));
        }
        if generator.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "generator.model must not be empty".to_string(),
            ));
        }
        if generator.provider != "openai" {
            return Err(ConfigError::Invalid(format!(
                "unsupported generator.provider: {}",
                generator.provider
            )));
        }
    }

    if let Some(ref publisher) = config.publisher {
        validate_url("publisher.webhook_url", &publisher.webhook_url)?;
        if publisher.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "publisher.api_key must not be empty".to_string(),
            ));
        }
        if publisher.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "publisher.timeout_secs must be greater than zero".to_string(),
            ));
        }
    }

    if let Some(ref media) = config.media {
        validate_url("media.webhook_url", &media.webhook_url)?;
        if media.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "media.timeout_secs must be greater than zero".to_string(),
            ));
        }
    }

    if let Some(ref storage) = config.storage {
        validate_url("storage.endpoint", &storage.endpoint)?;
        validate_url("storage.public_base", &storage.public_base)?;
    }

    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be an http(s) URL, got: {}",
            field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn base_config() -> Config {
        load_config_from_str(
            r#"
[auth]
method = "none"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_config_is_valid() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_api_key_method_requires_key() {
        let config = load_config_from_str(
            r#"
[auth]
method = "api_key"
"#,
        )
        .unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_publisher_url_must_be_http() {
        let config = load_config_from_str(
            r#"
[auth]
method = "none"

[publisher]
webhook_url = "ftp://hook.example.com"
api_key = "k"
"#,
        )
        .unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = load_config_from_str(
            r#"
[auth]
method = "none"

[publisher]
webhook_url = "https://hook.example.com"
api_key = "k"
timeout_secs = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unsupported_provider_rejected() {
        let config = load_config_from_str(
            r#"
[auth]
method = "none"

[generator]
provider = "palm"
api_key = "k"
"#,
        )
        .unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }
}
