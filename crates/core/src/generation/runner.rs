//! Generation runner: drives selected items through drafting.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::audit::{AuditEvent, AuditHandle};
use crate::bulk::SkippedItem;
use crate::content::{
    ensure_transition, ContentFilter, ContentItem, ContentStatus, ContentStore,
};
use crate::metrics;

use super::draft::DraftGenerator;
use super::types::{
    DraftRequest, GenerationError, GenerationMode, GenerationReport, GenerationRequest,
};

/// Upper bound on items drafted per run when selecting by mode.
const MODE_SELECTION_LIMIT: i64 = 500;

/// Drives content items from TOPIC_INGESTED/REJECTED through GENERATING into
/// PENDING_APPROVAL (or FAILED), one item at a time.
///
/// Each item is persisted as soon as it enters GENERATING, so a crash
/// mid-batch leaves accurate partial state rather than items silently stuck
/// where they were. There is deliberately no cross-item rollback.
pub struct GenerationRunner {
    store: Arc<dyn ContentStore>,
    generator: Arc<dyn DraftGenerator>,
    audit: Option<AuditHandle>,
}

impl GenerationRunner {
    pub fn new(store: Arc<dyn ContentStore>, generator: Arc<dyn DraftGenerator>) -> Self {
        Self {
            store,
            generator,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditHandle) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Run a generation pass over the selected items.
    pub async fn run(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationReport, GenerationError> {
        let items = self.select(request)?;

        let mut report = GenerationReport::default();

        for mut item in items {
            // Gate entry into GENERATING through the transition table; items
            // in an ineligible state are skipped untouched.
            if let Err(e) = ensure_transition(item.status, ContentStatus::Generating) {
                report.skipped_items.push(SkippedItem {
                    id: item.id.clone(),
                    status: item.status,
                    reason: e.to_string(),
                });
                metrics::GENERATION_ATTEMPTS
                    .with_label_values(&["skipped"])
                    .inc();
                continue;
            }

            item.status = ContentStatus::Generating;
            item.last_error = None;
            self.store.update(&item)?;

            let topic_text = item
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or("Untitled topic")
                .to_string();

            let draft_request = DraftRequest {
                topic_text,
                platform: item.platform.clone(),
                brand_id: item.brand_id.clone(),
                content_type: item.content_type,
                brand_context: request.brand_profile_summary.clone(),
            };

            let start = Instant::now();
            let result = self.generator.generate(&draft_request).await;
            metrics::GENERATION_DURATION
                .with_label_values(&[item.content_type.as_str()])
                .observe(start.elapsed().as_secs_f64());

            match result {
                Ok(draft) => {
                    let mut caption = draft.body_text.trim().to_string();

                    // For media items, surface the prompt inside the caption
                    // so reviewers see what the media generator will be asked
                    // to produce.
                    if item.content_type.is_media() {
                        if let Some(prompt) =
                            draft.media_prompt.as_deref().map(str::trim).filter(|p| !p.is_empty())
                        {
                            let label = if item.content_type.as_str() == "image" {
                                "IMAGE_PROMPT"
                            } else {
                                "VIDEO_PROMPT"
                            };
                            caption = format!("{}\n\n---\n{}:\n{}", caption, label, prompt);
                        }
                    }

                    item.body_text = Some(caption);
                    item.hashtags = draft
                        .hashtags
                        .as_deref()
                        .map(str::trim)
                        .filter(|h| !h.is_empty())
                        .map(String::from);

                    // The table routes GENERATING -> DRAFT_READY ->
                    // PENDING_APPROVAL; both hops are validated, only the end
                    // state is persisted.
                    ensure_transition(item.status, ContentStatus::DraftReady)
                        .and_then(|_| {
                            ensure_transition(
                                ContentStatus::DraftReady,
                                ContentStatus::PendingApproval,
                            )
                        })
                        .expect("generation path must stay in the transition table");

                    item.status = ContentStatus::PendingApproval;
                    item.last_error = None;
                    self.store.update(&item)?;

                    metrics::GENERATION_ATTEMPTS
                        .with_label_values(&["generated"])
                        .inc();
                    report.generated += 1;
                    debug!(item = %item.id, "Draft generated");
                }
                Err(e) => {
                    item.status = ContentStatus::Failed;
                    item.last_error = Some(e.to_string());
                    self.store.update(&item)?;

                    metrics::GENERATION_ATTEMPTS
                        .with_label_values(&["failed"])
                        .inc();
                    report.failed += 1;
                    warn!(item = %item.id, error = %e, "Draft generation failed");
                }
            }
        }

        report.skipped = report.skipped_items.len();

        if let Some(ref audit) = self.audit {
            audit
                .emit(AuditEvent::DraftsGenerated {
                    brand_id: request.brand_id.clone(),
                    generated: report.generated as u32,
                    failed: report.failed as u32,
                    skipped: report.skipped as u32,
                })
                .await;
        }

        Ok(report)
    }

    /// Resolve the run's item selection: explicit ids, or a status pool
    /// filtered by brand / platform / content type.
    fn select(&self, request: &GenerationRequest) -> Result<Vec<ContentItem>, GenerationError> {
        if let Some(ref ids) = request.content_item_ids {
            if ids.is_empty() {
                return Err(GenerationError::Validation(
                    "content_item_ids must be non-empty when provided".to_string(),
                ));
            }
            for id in ids {
                if uuid::Uuid::parse_str(id).is_err() {
                    return Err(GenerationError::Validation(format!(
                        "invalid content item id: {}",
                        id
                    )));
                }
            }

            let items = self.store.get_many(ids)?;
            if items.is_empty() {
                return Err(GenerationError::NotFound);
            }
            return Ok(items);
        }

        let status = match request.mode {
            Some(GenerationMode::Rejected) => ContentStatus::Rejected,
            Some(GenerationMode::New) | None => ContentStatus::TopicIngested,
        };

        let mut filter = ContentFilter::new()
            .with_status(status)
            .with_brand(&request.brand_id)
            .with_limit(MODE_SELECTION_LIMIT);

        if let Some(ref platform) = request.platform {
            filter = filter.with_platform(platform);
        }
        if let Some(content_type) = request.content_type {
            filter = filter.with_content_type(content_type);
        }

        Ok(self.store.list(&filter)?)
    }
}
