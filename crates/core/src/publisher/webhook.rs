//! HTTP webhook implementation of the publish bridge.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PublisherConfig;
use crate::metrics;

use super::types::{OutboundPost, PublishReceipt, PublisherError};

/// Trait for the external publishing automation.
///
/// One synchronous round trip: the whole batch goes out, a structured
/// per-item result comes back. Transport failures and non-2xx responses are
/// hard failures of the whole batch.
#[async_trait]
pub trait PublishBridge: Send + Sync {
    fn name(&self) -> &str;

    async fn publish_batch(
        &self,
        items: &[OutboundPost],
    ) -> Result<Vec<PublishReceipt>, PublisherError>;
}

#[derive(Debug, Serialize)]
struct BridgeRequest<'a> {
    items: &'a [OutboundPost],
}

#[derive(Debug, Deserialize)]
struct BridgeResponse {
    #[serde(default)]
    results: Vec<PublishReceipt>,
}

/// Publish bridge backed by an automation webhook (e.g. a Make scenario).
pub struct WebhookPublisher {
    client: Client,
    config: PublisherConfig,
}

impl WebhookPublisher {
    pub fn new(config: PublisherConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }
}

#[async_trait]
impl PublishBridge for WebhookPublisher {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn publish_batch(
        &self,
        items: &[OutboundPost],
    ) -> Result<Vec<PublishReceipt>, PublisherError> {
        if self.config.webhook_url.trim().is_empty() {
            return Err(PublisherError::NotConfigured(
                "webhook_url is not set".to_string(),
            ));
        }
        if self.config.api_key.trim().is_empty() {
            return Err(PublisherError::NotConfigured(
                "api_key is not set".to_string(),
            ));
        }

        debug!(count = items.len(), "Dispatching batch to publish webhook");
        let start = Instant::now();

        let response = self
            .client
            .post(&self.config.webhook_url)
            .header("x-api-key", &self.config.api_key)
            .json(&BridgeRequest { items })
            .send()
            .await
            .map_err(|e| {
                metrics::EXTERNAL_SERVICE_REQUESTS
                    .with_label_values(&["publisher", "publish_batch", "error"])
                    .inc();
                PublisherError::Transport(e.to_string())
            })?;

        metrics::EXTERNAL_SERVICE_DURATION
            .with_label_values(&["publisher", "publish_batch"])
            .observe(start.elapsed().as_secs_f64());

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            metrics::EXTERNAL_SERVICE_REQUESTS
                .with_label_values(&["publisher", "publish_batch", "error"])
                .inc();
            return Err(PublisherError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let bridge_response: BridgeResponse = response
            .json()
            .await
            .map_err(|e| PublisherError::Malformed(e.to_string()))?;

        metrics::EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["publisher", "publish_batch", "success"])
            .inc();

        Ok(bridge_response.results)
    }
}
