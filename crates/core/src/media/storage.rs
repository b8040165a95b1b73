//! Object storage for generated media.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use crate::config::StorageConfig;
use crate::metrics;

use super::types::MediaError;

/// Trait for "store bytes, get a public URL" backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Provider name, recorded on items as `media_provider`.
    fn provider(&self) -> &str;

    /// Upload the bytes and return their public URL.
    async fn put(&self, data: Vec<u8>, content_type: &str) -> Result<String, MediaError>;
}

/// Object store backed by an S3-style HTTP gateway: one PUT per object,
/// public URL derived from a configured base.
pub struct HttpObjectStore {
    client: Client,
    config: StorageConfig,
}

impl HttpObjectStore {
    pub fn new(config: StorageConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn extension_for(content_type: &str) -> &'static str {
        match content_type {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "video/mp4" => "mp4",
            "video/webm" => "webm",
            _ => "bin",
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn provider(&self) -> &str {
        "spaces"
    }

    async fn put(&self, data: Vec<u8>, content_type: &str) -> Result<String, MediaError> {
        if self.config.endpoint.trim().is_empty() {
            return Err(MediaError::NotConfigured(
                "storage endpoint is not set".to_string(),
            ));
        }

        let key = format!(
            "media/{}.{}",
            uuid::Uuid::new_v4(),
            Self::extension_for(content_type)
        );
        let url = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), key);

        let start = Instant::now();
        let response = self
            .client
            .put(&url)
            .header("x-api-key", &self.config.api_key)
            .header("x-amz-acl", "public-read")
            .header("Content-Type", content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        metrics::EXTERNAL_SERVICE_DURATION
            .with_label_values(&["object_store", "put"])
            .observe(start.elapsed().as_secs_f64());

        let status = response.status();
        if !status.is_success() {
            metrics::EXTERNAL_SERVICE_REQUESTS
                .with_label_values(&["object_store", "put", "error"])
                .inc();
            return Err(MediaError::Upload(format!("HTTP {}", status)));
        }

        metrics::EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["object_store", "put", "success"])
            .inc();

        Ok(format!(
            "{}/{}",
            self.config.public_base.trim_end_matches('/'),
            key
        ))
    }
}
