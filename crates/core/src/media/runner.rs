//! Media runner: drives image/video items through media generation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bulk::SkippedItem;
use crate::content::{ensure_transition, ContentItem, ContentStatus, ContentStore};
use crate::metrics;

use super::storage::ObjectStore;
use super::types::{MediaAsset, MediaError, MediaReport, MediaRequest};
use super::webhook::MediaGenerator;

/// Drives media items through GENERATING into PENDING_APPROVAL, calling the
/// media generator and uploading raw bytes through the object store when the
/// generator does not host the asset itself.
pub struct MediaRunner {
    store: Arc<dyn ContentStore>,
    generator: Arc<dyn MediaGenerator>,
    object_store: Arc<dyn ObjectStore>,
}

impl MediaRunner {
    pub fn new(
        store: Arc<dyn ContentStore>,
        generator: Arc<dyn MediaGenerator>,
        object_store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            store,
            generator,
            object_store,
        }
    }

    /// Generate media for the given items.
    ///
    /// Same per-item independence as draft generation: every item is
    /// persisted on entering GENERATING, failures mark that item FAILED, and
    /// the run continues.
    pub async fn run(&self, ids: &[String]) -> Result<MediaReport, MediaError> {
        let items = self.resolve(ids)?;

        let mut report = MediaReport::default();

        for mut item in items {
            if !item.content_type.is_media() {
                report.skipped_items.push(SkippedItem {
                    id: item.id.clone(),
                    status: item.status,
                    reason: format!("Not a media item (content_type={})", item.content_type),
                });
                metrics::MEDIA_ATTEMPTS.with_label_values(&["skipped"]).inc();
                continue;
            }

            if let Err(e) = ensure_transition(item.status, ContentStatus::Generating) {
                report.skipped_items.push(SkippedItem {
                    id: item.id.clone(),
                    status: item.status,
                    reason: e.to_string(),
                });
                metrics::MEDIA_ATTEMPTS.with_label_values(&["skipped"]).inc();
                continue;
            }

            item.status = ContentStatus::Generating;
            item.last_error = None;
            self.store.update(&item)?;

            let request = MediaRequest {
                content_item_id: item.id.clone(),
                brand_id: item.brand_id.clone(),
                platform: item.platform.clone(),
                content_type: item.content_type.as_str().to_string(),
                prompt: media_prompt_for(&item),
            };

            match self.generate_and_store(&request).await {
                Ok((media_url, thumbnail_url, provider)) => {
                    item.media_url = Some(media_url);
                    item.thumbnail_url = thumbnail_url;
                    item.media_provider = Some(provider);
                    item.media_type = Some(item.content_type.as_str().to_string());

                    // Same validated route as draft generation:
                    // GENERATING -> DRAFT_READY -> PENDING_APPROVAL.
                    ensure_transition(item.status, ContentStatus::DraftReady)
                        .and_then(|_| {
                            ensure_transition(
                                ContentStatus::DraftReady,
                                ContentStatus::PendingApproval,
                            )
                        })
                        .expect("media path must stay in the transition table");

                    item.status = ContentStatus::PendingApproval;
                    item.last_error = None;
                    self.store.update(&item)?;

                    metrics::MEDIA_ATTEMPTS
                        .with_label_values(&["generated"])
                        .inc();
                    report.generated += 1;
                    debug!(item = %item.id, "Media generated");
                }
                Err(e) => {
                    item.status = ContentStatus::Failed;
                    item.last_error = Some(e.to_string());
                    self.store.update(&item)?;

                    metrics::MEDIA_ATTEMPTS.with_label_values(&["failed"]).inc();
                    report.failed += 1;
                    warn!(item = %item.id, error = %e, "Media generation failed");
                }
            }
        }

        report.skipped = report.skipped_items.len();
        Ok(report)
    }

    async fn generate_and_store(
        &self,
        request: &MediaRequest,
    ) -> Result<(String, Option<String>, String), MediaError> {
        match self.generator.generate(request).await? {
            MediaAsset::Hosted {
                media_url,
                thumbnail_url,
            } => Ok((media_url, thumbnail_url, self.generator.name().to_string())),
            MediaAsset::Bytes { data, content_type } => {
                let url = self.object_store.put(data, &content_type).await?;
                Ok((url, None, self.object_store.provider().to_string()))
            }
        }
    }

    fn resolve(&self, ids: &[String]) -> Result<Vec<ContentItem>, MediaError> {
        if ids.is_empty() {
            return Err(MediaError::Validation(
                "content_item_ids is required".to_string(),
            ));
        }
        for id in ids {
            if uuid::Uuid::parse_str(id).is_err() {
                return Err(MediaError::Validation(format!(
                    "invalid content item id: {}",
                    id
                )));
            }
        }

        let items = self.store.get_many(ids)?;
        if items.is_empty() {
            return Err(MediaError::NotFound);
        }
        Ok(items)
    }
}

/// The prompt for the media generator. Drafting appends a labeled prompt
/// block to the caption; prefer that, then the caption itself, then the
/// topic title.
fn media_prompt_for(item: &ContentItem) -> String {
    let body = item.body_text.as_deref().unwrap_or("");

    for label in ["IMAGE_PROMPT:", "VIDEO_PROMPT:"] {
        if let Some(idx) = body.find(label) {
            let prompt = body[idx + label.len()..].trim();
            if !prompt.is_empty() {
                return prompt.to_string();
            }
        }
    }

    let fallback = body.trim();
    if !fallback.is_empty() {
        return fallback.to_string();
    }

    item.title.as_deref().unwrap_or("").trim().to_string()
}
