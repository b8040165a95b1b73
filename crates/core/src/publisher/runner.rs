//! Publish runner: filters, dispatches, and reconciles a batch.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::{info, warn};

use crate::audit::{AuditEvent, AuditHandle};
use crate::bulk::SkippedItem;
use crate::content::{ensure_transition, ContentItem, ContentStatus, ContentStore, ContentType};
use crate::metrics;

use super::types::{OutboundPost, PublishReport, PublisherError};
use super::webhook::PublishBridge;

static MD_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static MD_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static MD_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").unwrap());

/// Social platforms render markdown literally, so outbound text loses it.
fn strip_markdown(s: &str) -> String {
    let s = MD_BOLD.replace_all(s, "$1");
    let s = MD_ITALIC.replace_all(&s, "$1");
    let s = MD_CODE.replace_all(&s, "$1");
    s.into_owned()
}

/// Reconciles QUEUED items against one synchronous bridge round trip.
pub struct PublishRunner {
    store: Arc<dyn ContentStore>,
    bridge: Arc<dyn PublishBridge>,
    audit: Option<AuditHandle>,
}

impl PublishRunner {
    pub fn new(store: Arc<dyn ContentStore>, bridge: Arc<dyn PublishBridge>) -> Self {
        Self {
            store,
            bridge,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditHandle) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Dispatch the given items to the publishing automation and apply the
    /// per-item results.
    ///
    /// A transport-level failure (unreachable webhook, non-2xx status)
    /// aborts before any item is mutated. After a successful round trip,
    /// every item that was sent gets `attempt_count` incremented; items
    /// present in the response move to PUBLISHED or FAILED, items absent
    /// from it are reported as ambiguous and keep their status.
    pub async fn dispatch(&self, ids: &[String]) -> Result<PublishReport, PublisherError> {
        let items = self.resolve(ids)?;

        let mut report = PublishReport::default();
        let mut eligible: Vec<ContentItem> = Vec::new();
        let mut to_send: Vec<OutboundPost> = Vec::new();

        for item in items {
            match Self::build_outbound(&item) {
                Ok(post) => {
                    to_send.push(post);
                    eligible.push(item);
                }
                Err(reason) => {
                    metrics::PUBLISH_ITEMS
                        .with_label_values(&["skipped"])
                        .inc();
                    report.skipped_items.push(SkippedItem {
                        id: item.id.clone(),
                        status: item.status,
                        reason,
                    });
                }
            }
        }

        report.skipped = report.skipped_items.len();

        if to_send.is_empty() {
            return Ok(report);
        }

        let receipts = match self.bridge.publish_batch(&to_send).await {
            Ok(receipts) => {
                metrics::PUBLISH_DISPATCHES.with_label_values(&["ok"]).inc();
                receipts
            }
            Err(e) => {
                let label = match e {
                    PublisherError::Rejected { .. } => "rejected",
                    _ => "transport_error",
                };
                metrics::PUBLISH_DISPATCHES.with_label_values(&[label]).inc();
                return Err(e);
            }
        };

        report.sent = to_send.len();

        let receipts_by_id: HashMap<&str, _> = receipts
            .iter()
            .map(|r| (r.content_item_id.as_str(), r))
            .collect();

        let now = Utc::now();
        let mut mutated = Vec::new();

        for mut item in eligible {
            // The attempt happened whether or not the automation reported on
            // it, so the counter moves for every sent item.
            item.attempt_count += 1;

            let Some(receipt) = receipts_by_id.get(item.id.as_str()) else {
                metrics::PUBLISH_ITEMS
                    .with_label_values(&["missing"])
                    .inc();
                report.missing_in_response.push(item.id.clone());
                mutated.push(item);
                continue;
            };

            if receipt.ok {
                match ensure_transition(item.status, ContentStatus::Published) {
                    Ok(()) => {
                        item.status = ContentStatus::Published;
                        item.published_url = receipt
                            .published_url
                            .as_deref()
                            .map(str::trim)
                            .filter(|u| !u.is_empty())
                            .map(String::from);
                        item.published_at = Some(now);
                        item.last_error = None;
                        metrics::PUBLISH_ITEMS
                            .with_label_values(&["published"])
                            .inc();
                        report.published += 1;
                    }
                    Err(e) => {
                        // A concurrent operation moved the item while the
                        // batch was in flight; leave its status alone.
                        warn!(item = %item.id, error = %e, "Publish receipt for ineligible item");
                        report.skipped_items.push(SkippedItem {
                            id: item.id.clone(),
                            status: item.status,
                            reason: e.to_string(),
                        });
                    }
                }
            } else {
                let error = receipt
                    .error
                    .as_deref()
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .unwrap_or("Publish failed");

                match ensure_transition(item.status, ContentStatus::Failed) {
                    Ok(()) => {
                        item.status = ContentStatus::Failed;
                        item.last_error = Some(error.to_string());
                        metrics::PUBLISH_ITEMS.with_label_values(&["failed"]).inc();
                        report.failed += 1;
                    }
                    Err(e) => {
                        warn!(item = %item.id, error = %e, "Failure receipt for ineligible item");
                        report.skipped_items.push(SkippedItem {
                            id: item.id.clone(),
                            status: item.status,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            mutated.push(item);
        }

        self.store.update_batch(&mutated)?;
        report.skipped = report.skipped_items.len();

        info!(
            sent = report.sent,
            published = report.published,
            failed = report.failed,
            missing = report.missing_in_response.len(),
            "Publish batch reconciled"
        );

        if let Some(ref audit) = self.audit {
            audit
                .emit(AuditEvent::PublishReconciled {
                    sent: report.sent as u32,
                    published: report.published as u32,
                    failed: report.failed as u32,
                    missing_in_response: report.missing_in_response.clone(),
                })
                .await;
        }

        Ok(report)
    }

    fn resolve(&self, ids: &[String]) -> Result<Vec<ContentItem>, PublisherError> {
        if ids.is_empty() {
            return Err(PublisherError::Validation(
                "content_item_ids is required".to_string(),
            ));
        }
        for id in ids {
            if uuid::Uuid::parse_str(id).is_err() {
                return Err(PublisherError::Validation(format!(
                    "invalid content item id: {}",
                    id
                )));
            }
        }

        let items = self.store.get_many(ids)?;
        if items.is_empty() {
            return Err(PublisherError::NotFound);
        }
        Ok(items)
    }

    /// Build the outbound payload for one item, or a skip reason.
    ///
    /// Strict gate: only QUEUED items with a complete payload are sent.
    fn build_outbound(item: &ContentItem) -> Result<OutboundPost, String> {
        if item.status != ContentStatus::Queued {
            return Err("Only QUEUED items can be sent to the publisher".to_string());
        }

        let text = item
            .body_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(strip_markdown);

        let caption = item
            .media_caption
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(strip_markdown)
            .or_else(|| text.clone());

        match item.content_type {
            ContentType::Text => {
                if text.is_none() {
                    return Err("No body_text to publish as text".to_string());
                }
            }
            ContentType::Image | ContentType::Video => {
                if item.media_url.is_none() && item.media_urls.is_empty() {
                    return Err(format!(
                        "No media_url(s) for {} publish",
                        item.content_type
                    ));
                }
            }
        }

        let media_type = item
            .media_type
            .clone()
            .or_else(|| {
                item.content_type
                    .is_media()
                    .then(|| item.content_type.as_str().to_string())
            });

        Ok(OutboundPost {
            content_item_id: item.id.clone(),
            brand_id: item.brand_id.clone(),
            platform: item.platform.clone(),
            content_type: item.content_type.as_str().to_string(),
            scheduled_at: item.scheduled_at,
            text,
            caption,
            hashtags: item
                .hashtags
                .as_deref()
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(String::from),
            media_url: item.media_url.clone(),
            media_urls: item.media_urls.clone(),
            media_type,
            thumbnail_url: item.thumbnail_url.clone(),
        })
    }
}
