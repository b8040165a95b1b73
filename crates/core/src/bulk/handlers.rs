//! The bulk operation handlers.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::content::{ensure_transition, ContentItem, ContentStatus, ContentStore};
use crate::metrics;

use super::{BulkError, BulkOutcome, SkippedItem};

/// Resolve a list of ids to stored items.
///
/// An empty or malformed id list is rejected before any lookup; a lookup
/// that matches nothing is `NotFound`.
fn resolve(store: &dyn ContentStore, ids: &[String]) -> Result<Vec<ContentItem>, BulkError> {
    if ids.is_empty() {
        return Err(BulkError::Validation(
            "content_item_ids is required".to_string(),
        ));
    }

    for id in ids {
        if uuid::Uuid::parse_str(id).is_err() {
            return Err(BulkError::Validation(format!(
                "invalid content item id: {}",
                id
            )));
        }
    }

    let items = store.get_many(ids)?;
    if items.is_empty() {
        return Err(BulkError::NotFound);
    }
    Ok(items)
}

fn skip(skipped: &mut Vec<SkippedItem>, item: &ContentItem, reason: impl Into<String>) {
    skipped.push(SkippedItem {
        id: item.id.clone(),
        status: item.status,
        reason: reason.into(),
    });
}

fn record(op: &str, outcome: &BulkOutcome) {
    metrics::BULK_ITEMS
        .with_label_values(&[op, "changed"])
        .inc_by(outcome.changed as u64);
    metrics::BULK_ITEMS
        .with_label_values(&[op, "skipped"])
        .inc_by(outcome.skipped() as u64);
    info!(
        op = op,
        changed = outcome.changed,
        skipped = outcome.skipped(),
        "Bulk operation finished"
    );
}

/// Approve items that are in review (PENDING_APPROVAL or DRAFT_READY).
pub fn approve(store: &dyn ContentStore, ids: &[String]) -> Result<BulkOutcome, BulkError> {
    let items = resolve(store, ids)?;

    let mut changed = Vec::new();
    let mut skipped = Vec::new();

    for mut item in items {
        if !matches!(
            item.status,
            ContentStatus::PendingApproval | ContentStatus::DraftReady
        ) {
            skip(
                &mut skipped,
                &item,
                "Item must be PENDING_APPROVAL/DRAFT_READY first",
            );
            continue;
        }

        if let Err(e) = ensure_transition(item.status, ContentStatus::Approved) {
            skip(&mut skipped, &item, e.to_string());
            continue;
        }

        item.status = ContentStatus::Approved;
        item.last_error = None;
        changed.push(item);
    }

    store.update_batch(&changed)?;

    let outcome = BulkOutcome {
        changed: changed.len(),
        skipped_items: skipped,
    };
    record("approve", &outcome);
    Ok(outcome)
}

/// Reject items that are in review, recording the supplied reason.
pub fn reject(
    store: &dyn ContentStore,
    ids: &[String],
    reason: Option<&str>,
) -> Result<BulkOutcome, BulkError> {
    let items = resolve(store, ids)?;
    let reason = reason.map(str::trim).filter(|r| !r.is_empty());

    let mut changed = Vec::new();
    let mut skipped = Vec::new();

    for mut item in items {
        if !matches!(
            item.status,
            ContentStatus::PendingApproval | ContentStatus::DraftReady
        ) {
            skip(
                &mut skipped,
                &item,
                "Item must be PENDING_APPROVAL/DRAFT_READY first",
            );
            continue;
        }

        if let Err(e) = ensure_transition(item.status, ContentStatus::Rejected) {
            skip(&mut skipped, &item, e.to_string());
            continue;
        }

        item.status = ContentStatus::Rejected;
        item.last_error = reason.map(String::from);
        changed.push(item);
    }

    store.update_batch(&changed)?;

    let outcome = BulkOutcome {
        changed: changed.len(),
        skipped_items: skipped,
    };
    record("reject", &outcome);
    Ok(outcome)
}

/// Schedule a batch of APPROVED items for the given time.
///
/// Unlike the other operations this is all-or-nothing: every item is checked
/// before any is mutated, and a single ineligible item fails the whole
/// request with no partial effect.
pub fn schedule(
    store: &dyn ContentStore,
    ids: &[String],
    scheduled_at: DateTime<Utc>,
) -> Result<BulkOutcome, BulkError> {
    let items = resolve(store, ids)?;

    for item in &items {
        ensure_transition(item.status, ContentStatus::Scheduled).map_err(|_| {
            BulkError::NotSchedulable {
                id: item.id.clone(),
                status: item.status,
            }
        })?;
        if item.status != ContentStatus::Approved {
            return Err(BulkError::NotSchedulable {
                id: item.id.clone(),
                status: item.status,
            });
        }
    }

    let changed: Vec<ContentItem> = items
        .into_iter()
        .map(|mut item| {
            item.status = ContentStatus::Scheduled;
            item.scheduled_at = Some(scheduled_at);
            item.last_error = None;
            item
        })
        .collect();

    store.update_batch(&changed)?;

    let outcome = BulkOutcome {
        changed: changed.len(),
        skipped_items: Vec::new(),
    };
    record("schedule", &outcome);
    debug!(at = %scheduled_at, count = outcome.changed, "Batch scheduled");
    Ok(outcome)
}

/// Move SCHEDULED items into the publish queue.
pub fn mark_queued(store: &dyn ContentStore, ids: &[String]) -> Result<BulkOutcome, BulkError> {
    let items = resolve(store, ids)?;

    let mut changed = Vec::new();
    let mut skipped = Vec::new();

    for mut item in items {
        if item.status != ContentStatus::Scheduled {
            skip(&mut skipped, &item, "Only SCHEDULED items can be queued");
            continue;
        }

        if let Err(e) = ensure_transition(item.status, ContentStatus::Queued) {
            skip(&mut skipped, &item, e.to_string());
            continue;
        }

        item.status = ContentStatus::Queued;
        item.last_error = None;
        changed.push(item);
    }

    store.update_batch(&changed)?;

    let outcome = BulkOutcome {
        changed: changed.len(),
        skipped_items: skipped,
    };
    record("mark_queued", &outcome);
    Ok(outcome)
}

/// Confirm publication of QUEUED items.
///
/// Strict precondition: only QUEUED items can be published here, even though
/// the transition table also allows SCHEDULED -> PUBLISHED for the bridge's
/// reconciliation path.
pub fn mark_published(
    store: &dyn ContentStore,
    ids: &[String],
    published_url: Option<&str>,
) -> Result<BulkOutcome, BulkError> {
    let items = resolve(store, ids)?;
    let published_url = published_url.map(str::trim).filter(|u| !u.is_empty());
    let now = Utc::now();

    let mut changed = Vec::new();
    let mut skipped = Vec::new();

    for mut item in items {
        if item.status != ContentStatus::Queued {
            skip(&mut skipped, &item, "Only QUEUED items can be published");
            continue;
        }

        if let Err(e) = ensure_transition(item.status, ContentStatus::Published) {
            skip(&mut skipped, &item, e.to_string());
            continue;
        }

        item.status = ContentStatus::Published;
        item.published_at = Some(now);
        if let Some(url) = published_url {
            item.published_url = Some(url.to_string());
        }
        item.last_error = None;
        changed.push(item);
    }

    store.update_batch(&changed)?;

    let outcome = BulkOutcome {
        changed: changed.len(),
        skipped_items: skipped,
    };
    record("mark_published", &outcome);
    Ok(outcome)
}

/// Pull QUEUED items back to SCHEDULED.
pub fn undo_queued(store: &dyn ContentStore, ids: &[String]) -> Result<BulkOutcome, BulkError> {
    let items = resolve(store, ids)?;

    let mut changed = Vec::new();
    let mut skipped = Vec::new();

    for mut item in items {
        if item.status != ContentStatus::Queued {
            skip(&mut skipped, &item, "Only QUEUED items can be reverted");
            continue;
        }

        if let Err(e) = ensure_transition(item.status, ContentStatus::Scheduled) {
            skip(&mut skipped, &item, e.to_string());
            continue;
        }

        item.status = ContentStatus::Scheduled;
        changed.push(item);
    }

    store.update_batch(&changed)?;

    let outcome = BulkOutcome {
        changed: changed.len(),
        skipped_items: skipped,
    };
    record("undo_queued", &outcome);
    Ok(outcome)
}

/// Send FAILED items back to SCHEDULED for another attempt.
pub fn retry_failed(store: &dyn ContentStore, ids: &[String]) -> Result<BulkOutcome, BulkError> {
    let items = resolve(store, ids)?;

    let mut changed = Vec::new();
    let mut skipped = Vec::new();

    for mut item in items {
        if item.status != ContentStatus::Failed {
            skip(&mut skipped, &item, "Only FAILED items can be retried");
            continue;
        }

        if let Err(e) = ensure_transition(item.status, ContentStatus::Scheduled) {
            skip(&mut skipped, &item, e.to_string());
            continue;
        }

        item.status = ContentStatus::Scheduled;
        item.last_error = None;
        item.attempt_count += 1;
        changed.push(item);
    }

    store.update_batch(&changed)?;

    let outcome = BulkOutcome {
        changed: changed.len(),
        skipped_items: skipped,
    };
    record("retry_failed", &outcome);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentFilter, ContentType, SqliteContentStore};

    fn store_with(statuses: &[ContentStatus]) -> (SqliteContentStore, Vec<String>) {
        let store = SqliteContentStore::in_memory().unwrap();
        let items: Vec<ContentItem> = statuses
            .iter()
            .map(|status| {
                let mut item =
                    ContentItem::new("topic-1", "acme", "facebook", ContentType::Text, "t");
                item.status = *status;
                item.body_text = Some("post body".to_string());
                item
            })
            .collect();
        store.insert_batch(&items).unwrap();
        let ids = items.iter().map(|i| i.id.clone()).collect();
        (store, ids)
    }

    #[test]
    fn test_approve_pending_and_draft_ready() {
        let (store, ids) = store_with(&[
            ContentStatus::PendingApproval,
            ContentStatus::DraftReady,
            ContentStatus::Scheduled,
        ]);

        let outcome = approve(&store, &ids).unwrap();
        assert_eq!(outcome.changed, 2);
        assert_eq!(outcome.skipped(), 1);
        assert_eq!(outcome.skipped_items[0].status, ContentStatus::Scheduled);
        assert!(outcome.skipped_items[0]
            .reason
            .contains("PENDING_APPROVAL/DRAFT_READY"));

        // The scheduled item is untouched.
        let scheduled = store.get(&ids[2]).unwrap().unwrap();
        assert_eq!(scheduled.status, ContentStatus::Scheduled);
    }

    #[test]
    fn test_approve_clears_last_error() {
        let (store, ids) = store_with(&[ContentStatus::PendingApproval]);
        let mut item = store.get(&ids[0]).unwrap().unwrap();
        item.last_error = Some("previous failure".to_string());
        store.update(&item).unwrap();

        approve(&store, &ids).unwrap();

        let item = store.get(&ids[0]).unwrap().unwrap();
        assert_eq!(item.status, ContentStatus::Approved);
        assert!(item.last_error.is_none());
    }

    #[test]
    fn test_reject_sets_reason_as_last_error() {
        let (store, ids) = store_with(&[ContentStatus::PendingApproval]);

        let outcome = reject(&store, &ids, Some("tone is off")).unwrap();
        assert_eq!(outcome.changed, 1);

        let item = store.get(&ids[0]).unwrap().unwrap();
        assert_eq!(item.status, ContentStatus::Rejected);
        assert_eq!(item.last_error.as_deref(), Some("tone is off"));
    }

    #[test]
    fn test_reject_without_reason() {
        let (store, ids) = store_with(&[ContentStatus::DraftReady]);
        reject(&store, &ids, Some("   ")).unwrap();

        let item = store.get(&ids[0]).unwrap().unwrap();
        assert_eq!(item.status, ContentStatus::Rejected);
        assert!(item.last_error.is_none());
    }

    #[test]
    fn test_empty_ids_is_validation_error() {
        let (store, _) = store_with(&[ContentStatus::PendingApproval]);
        assert!(matches!(
            approve(&store, &[]),
            Err(BulkError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_ids_rejected_before_lookup() {
        let (store, _) = store_with(&[ContentStatus::PendingApproval]);
        let ids = vec!["not-a-uuid".to_string()];
        assert!(matches!(
            approve(&store, &ids),
            Err(BulkError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_ids_is_not_found() {
        let (store, _) = store_with(&[ContentStatus::PendingApproval]);
        let ids = vec![uuid::Uuid::new_v4().to_string()];
        assert!(matches!(approve(&store, &ids), Err(BulkError::NotFound)));
    }

    #[test]
    fn test_schedule_all_approved() {
        let (store, ids) = store_with(&[ContentStatus::Approved; 5]);
        let at = Utc::now();

        let outcome = schedule(&store, &ids, at).unwrap();
        assert_eq!(outcome.changed, 5);
        assert_eq!(outcome.skipped(), 0);

        let items = store.get_many(&ids).unwrap();
        for item in items {
            assert_eq!(item.status, ContentStatus::Scheduled);
            // All five share the same slot.
            assert!((item.scheduled_at.unwrap() - at).num_seconds().abs() < 1);
            assert!(item.last_error.is_none());
        }
    }

    #[test]
    fn test_schedule_is_all_or_nothing() {
        let (store, ids) = store_with(&[
            ContentStatus::Approved,
            ContentStatus::Approved,
            ContentStatus::PendingApproval,
            ContentStatus::Approved,
            ContentStatus::Approved,
        ]);

        let result = schedule(&store, &ids, Utc::now());
        assert!(matches!(result, Err(BulkError::NotSchedulable { .. })));

        // Zero items were mutated.
        let scheduled = store
            .count(&ContentFilter::new().with_status(ContentStatus::Scheduled))
            .unwrap();
        assert_eq!(scheduled, 0);
        let approved = store
            .count(&ContentFilter::new().with_status(ContentStatus::Approved))
            .unwrap();
        assert_eq!(approved, 4);
    }

    #[test]
    fn test_mark_queued() {
        let (store, ids) = store_with(&[ContentStatus::Scheduled, ContentStatus::Approved]);

        let outcome = mark_queued(&store, &ids).unwrap();
        assert_eq!(outcome.changed, 1);
        assert_eq!(outcome.skipped(), 1);
        assert!(outcome.skipped_items[0].reason.contains("SCHEDULED"));

        assert_eq!(
            store.get(&ids[0]).unwrap().unwrap().status,
            ContentStatus::Queued
        );
    }

    #[test]
    fn test_mark_published_sets_url_and_timestamp() {
        let (store, ids) = store_with(&[ContentStatus::Queued]);

        let outcome =
            mark_published(&store, &ids, Some("https://facebook.com/p/123")).unwrap();
        assert_eq!(outcome.changed, 1);

        let item = store.get(&ids[0]).unwrap().unwrap();
        assert_eq!(item.status, ContentStatus::Published);
        assert!(item.published_at.is_some());
        assert_eq!(
            item.published_url.as_deref(),
            Some("https://facebook.com/p/123")
        );
    }

    #[test]
    fn test_mark_published_twice_is_a_noop_skip() {
        let (store, ids) = store_with(&[ContentStatus::Queued]);
        mark_published(&store, &ids, None).unwrap();
        let first = store.get(&ids[0]).unwrap().unwrap();

        let outcome = mark_published(&store, &ids, None).unwrap();
        assert_eq!(outcome.changed, 0);
        assert_eq!(outcome.skipped(), 1);
        assert!(outcome.skipped_items[0].reason.contains("QUEUED"));

        // Status and publication data unchanged.
        let second = store.get(&ids[0]).unwrap().unwrap();
        assert_eq!(second.status, ContentStatus::Published);
        assert_eq!(second.published_at, first.published_at);
    }

    #[test]
    fn test_undo_queued() {
        let (store, ids) = store_with(&[ContentStatus::Queued, ContentStatus::Published]);

        let outcome = undo_queued(&store, &ids).unwrap();
        assert_eq!(outcome.changed, 1);
        assert_eq!(outcome.skipped(), 1);

        assert_eq!(
            store.get(&ids[0]).unwrap().unwrap().status,
            ContentStatus::Scheduled
        );
        assert_eq!(
            store.get(&ids[1]).unwrap().unwrap().status,
            ContentStatus::Published
        );
    }

    #[test]
    fn test_undo_queued_preserves_schedule_and_attempts() {
        let (store, ids) = store_with(&[ContentStatus::Queued]);
        let mut item = store.get(&ids[0]).unwrap().unwrap();
        item.scheduled_at = Some(Utc::now());
        item.attempt_count = 2;
        store.update(&item).unwrap();

        undo_queued(&store, &ids).unwrap();

        let item = store.get(&ids[0]).unwrap().unwrap();
        assert_eq!(item.status, ContentStatus::Scheduled);
        assert!(item.scheduled_at.is_some());
        assert_eq!(item.attempt_count, 2);
    }

    #[test]
    fn test_retry_failed_increments_attempts_and_clears_error() {
        let (store, ids) = store_with(&[ContentStatus::Failed]);
        let mut item = store.get(&ids[0]).unwrap().unwrap();
        item.attempt_count = 2;
        item.last_error = Some("webhook timeout".to_string());
        store.update(&item).unwrap();

        let outcome = retry_failed(&store, &ids).unwrap();
        assert_eq!(outcome.changed, 1);

        let item = store.get(&ids[0]).unwrap().unwrap();
        assert_eq!(item.status, ContentStatus::Scheduled);
        assert_eq!(item.attempt_count, 3);
        assert!(item.last_error.is_none());
    }

    #[test]
    fn test_retry_skips_non_failed() {
        let (store, ids) = store_with(&[ContentStatus::Published, ContentStatus::Queued]);

        let outcome = retry_failed(&store, &ids).unwrap();
        assert_eq!(outcome.changed, 0);
        assert_eq!(outcome.skipped(), 2);
        for skipped in &outcome.skipped_items {
            assert!(skipped.reason.contains("FAILED"));
        }
    }

    #[test]
    fn test_mixed_batch_partial_success() {
        let (store, ids) = store_with(&[
            ContentStatus::PendingApproval,
            ContentStatus::Failed,
            ContentStatus::DraftReady,
            ContentStatus::Published,
        ]);

        let outcome = approve(&store, &ids).unwrap();
        assert_eq!(outcome.changed, 2);
        assert_eq!(outcome.skipped(), 2);

        let skipped_ids: Vec<&str> = outcome
            .skipped_items
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert!(skipped_ids.contains(&ids[1].as_str()));
        assert!(skipped_ids.contains(&ids[3].as_str()));
    }
}
