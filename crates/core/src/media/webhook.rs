//! Webhook-backed media generator.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use crate::config::MediaConfig;
use crate::metrics;

use super::types::{MediaAsset, MediaError, MediaRequest, MediaUrlResponse};

/// Trait for media generators.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Produce media for one item: either a hosted URL or raw bytes.
    async fn generate(&self, request: &MediaRequest) -> Result<MediaAsset, MediaError>;
}

/// Media generator backed by an automation webhook.
///
/// The webhook may answer with JSON (`{media_url, thumbnail_url?}`) when it
/// hosts the asset itself, or with the raw asset bytes, in which case the
/// response content type is the asset's mime type and the caller uploads the
/// bytes to the object store.
pub struct WebhookMediaGenerator {
    client: Client,
    config: MediaConfig,
}

impl WebhookMediaGenerator {
    pub fn new(config: MediaConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }
}

#[async_trait]
impl MediaGenerator for WebhookMediaGenerator {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn generate(&self, request: &MediaRequest) -> Result<MediaAsset, MediaError> {
        if self.config.webhook_url.trim().is_empty() {
            return Err(MediaError::NotConfigured(
                "webhook_url is not set".to_string(),
            ));
        }

        let start = Instant::now();
        let response = self
            .client
            .post(&self.config.webhook_url)
            .header("x-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                metrics::EXTERNAL_SERVICE_REQUESTS
                    .with_label_values(&["media", "generate", "error"])
                    .inc();
                MediaError::Transport(e.to_string())
            })?;

        metrics::EXTERNAL_SERVICE_DURATION
            .with_label_values(&["media", "generate"])
            .observe(start.elapsed().as_secs_f64());

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            metrics::EXTERNAL_SERVICE_REQUESTS
                .with_label_values(&["media", "generate", "error"])
                .inc();
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .split(';')
            .next()
            .unwrap_or("application/octet-stream")
            .trim()
            .to_string();

        metrics::EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["media", "generate", "success"])
            .inc();

        if content_type == "application/json" {
            let parsed: MediaUrlResponse = response
                .json()
                .await
                .map_err(|e| MediaError::Malformed(e.to_string()))?;
            if parsed.media_url.trim().is_empty() {
                return Err(MediaError::Malformed("empty media_url".to_string()));
            }
            return Ok(MediaAsset::Hosted {
                media_url: parsed.media_url,
                thumbnail_url: parsed.thumbnail_url,
            });
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| MediaError::Transport(e.to_string()))?
            .to_vec();

        if data.is_empty() {
            return Err(MediaError::Malformed("empty media body".to_string()));
        }

        Ok(MediaAsset::Bytes { data, content_type })
    }
}
