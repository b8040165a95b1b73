//! Publish bridge integration tests.
//!
//! Dispatch + reconciliation over an in-memory store and a mock bridge:
//! QUEUED items go out as one batch, receipts move them to PUBLISHED or
//! FAILED, absent receipts leave them ambiguous but counted.

use std::sync::Arc;

use soapbox_core::{
    testing::{fixtures, MockPublishBridge},
    ContentItem, ContentStatus, ContentStore, ContentType, PublishBridge, PublishReceipt,
    PublishRunner, PublisherError, SqliteContentStore,
};

struct TestHarness {
    store: Arc<SqliteContentStore>,
    bridge: Arc<MockPublishBridge>,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            store: Arc::new(SqliteContentStore::in_memory().expect("store")),
            bridge: Arc::new(MockPublishBridge::new()),
        }
    }

    fn runner(&self) -> PublishRunner {
        PublishRunner::new(
            Arc::clone(&self.store) as Arc<dyn ContentStore>,
            Arc::clone(&self.bridge) as Arc<dyn PublishBridge>,
        )
    }

    fn insert(&self, items: Vec<ContentItem>) -> Vec<String> {
        self.store.insert_batch(&items).expect("insert");
        items.into_iter().map(|i| i.id).collect()
    }
}

#[tokio::test]
async fn test_happy_path_publishes_all() {
    let harness = TestHarness::new();
    let ids = harness.insert(vec![
        fixtures::text_item(ContentStatus::Queued),
        fixtures::text_item(ContentStatus::Queued),
    ]);

    let report = harness.runner().dispatch(&ids).await.unwrap();

    assert_eq!(report.sent, 2);
    assert_eq!(report.published, 2);
    assert_eq!(report.failed, 0);
    assert!(report.missing_in_response.is_empty());

    for id in &ids {
        let item = harness.store.get(id).unwrap().unwrap();
        assert_eq!(item.status, ContentStatus::Published);
        assert!(item.published_at.is_some());
        assert!(item.published_url.is_some());
        assert_eq!(item.attempt_count, 1);
        assert!(item.last_error.is_none());
    }
}

#[tokio::test]
async fn test_mixed_receipts_and_missing_item() {
    let harness = TestHarness::new();
    let ids = harness.insert(vec![
        fixtures::text_item(ContentStatus::Queued),
        fixtures::text_item(ContentStatus::Queued),
        fixtures::text_item(ContentStatus::Queued),
    ]);

    // Receipts for the first two only; the third is absent from the
    // response. First succeeds, second fails.
    let ok_id = ids[0].clone();
    let fail_id = ids[1].clone();
    harness
        .bridge
        .set_receipt_fn(move |post| {
            if post.content_item_id == ok_id {
                Some(PublishReceipt {
                    content_item_id: post.content_item_id.clone(),
                    ok: true,
                    published_url: Some("https://facebook.com/p/1".to_string()),
                    error: None,
                })
            } else if post.content_item_id == fail_id {
                Some(PublishReceipt {
                    content_item_id: post.content_item_id.clone(),
                    ok: false,
                    published_url: None,
                    error: Some("rate limited".to_string()),
                })
            } else {
                None
            }
        })
        .await;

    let report = harness.runner().dispatch(&ids).await.unwrap();

    assert_eq!(report.sent, 3);
    assert_eq!(report.published, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.missing_in_response, vec![ids[2].clone()]);

    let published = harness.store.get(&ids[0]).unwrap().unwrap();
    assert_eq!(published.status, ContentStatus::Published);
    assert_eq!(
        published.published_url.as_deref(),
        Some("https://facebook.com/p/1")
    );

    let failed = harness.store.get(&ids[1]).unwrap().unwrap();
    assert_eq!(failed.status, ContentStatus::Failed);
    assert_eq!(failed.last_error.as_deref(), Some("rate limited"));

    // Ambiguous outcome: status untouched, but the attempt still counts.
    let missing = harness.store.get(&ids[2]).unwrap().unwrap();
    assert_eq!(missing.status, ContentStatus::Queued);

    for id in &ids {
        assert_eq!(harness.store.get(id).unwrap().unwrap().attempt_count, 1);
    }
}

#[tokio::test]
async fn test_non_queued_and_empty_items_never_sent() {
    let harness = TestHarness::new();

    let mut empty_text = fixtures::text_item(ContentStatus::Queued);
    empty_text.body_text = None;

    let mut no_media = fixtures::image_item(ContentStatus::Queued);
    no_media.media_url = None;
    no_media.media_urls = Vec::new();

    let ids = harness.insert(vec![
        fixtures::text_item(ContentStatus::Scheduled),
        empty_text,
        no_media,
        fixtures::text_item(ContentStatus::Queued),
    ]);

    let report = harness.runner().dispatch(&ids).await.unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.skipped, 3);

    let batches = harness.bridge.dispatched_batches().await;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].content_item_id, ids[3]);

    // Skipped items were not mutated at all.
    let scheduled = harness.store.get(&ids[0]).unwrap().unwrap();
    assert_eq!(scheduled.status, ContentStatus::Scheduled);
    assert_eq!(scheduled.attempt_count, 0);
}

#[tokio::test]
async fn test_all_items_filtered_skips_the_webhook_call() {
    let harness = TestHarness::new();
    let ids = harness.insert(vec![fixtures::text_item(ContentStatus::Scheduled)]);

    let report = harness.runner().dispatch(&ids).await.unwrap();

    assert_eq!(report.sent, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(harness.bridge.dispatch_count().await, 0);
}

#[tokio::test]
async fn test_transport_failure_mutates_nothing() {
    let harness = TestHarness::new();
    let ids = harness.insert(vec![
        fixtures::text_item(ContentStatus::Queued),
        fixtures::text_item(ContentStatus::Queued),
    ]);

    harness
        .bridge
        .set_next_error(PublisherError::Transport("connection refused".to_string()))
        .await;

    let result = harness.runner().dispatch(&ids).await;
    assert!(matches!(result, Err(PublisherError::Transport(_))));

    for id in &ids {
        let item = harness.store.get(id).unwrap().unwrap();
        assert_eq!(item.status, ContentStatus::Queued);
        assert_eq!(item.attempt_count, 0);
    }
}

#[tokio::test]
async fn test_webhook_rejection_mutates_nothing() {
    let harness = TestHarness::new();
    let ids = harness.insert(vec![fixtures::text_item(ContentStatus::Queued)]);

    harness
        .bridge
        .set_next_error(PublisherError::Rejected {
            status: 500,
            body: "scenario error".to_string(),
        })
        .await;

    let result = harness.runner().dispatch(&ids).await;
    assert!(matches!(result, Err(PublisherError::Rejected { .. })));

    let item = harness.store.get(&ids[0]).unwrap().unwrap();
    assert_eq!(item.status, ContentStatus::Queued);
    assert_eq!(item.attempt_count, 0);
}

#[tokio::test]
async fn test_failure_receipt_without_error_text_gets_default() {
    let harness = TestHarness::new();
    let ids = harness.insert(vec![fixtures::text_item(ContentStatus::Queued)]);

    harness
        .bridge
        .set_receipt_fn(|post| {
            Some(PublishReceipt {
                content_item_id: post.content_item_id.clone(),
                ok: false,
                published_url: None,
                error: None,
            })
        })
        .await;

    harness.runner().dispatch(&ids).await.unwrap();

    let item = harness.store.get(&ids[0]).unwrap().unwrap();
    assert_eq!(item.status, ContentStatus::Failed);
    assert_eq!(item.last_error.as_deref(), Some("Publish failed"));
}

#[tokio::test]
async fn test_empty_ids_validation_and_unknown_ids_not_found() {
    let harness = TestHarness::new();

    let result = harness.runner().dispatch(&[]).await;
    assert!(matches!(result, Err(PublisherError::Validation(_))));

    let ids = vec![uuid::Uuid::new_v4().to_string()];
    let result = harness.runner().dispatch(&ids).await;
    assert!(matches!(result, Err(PublisherError::NotFound)));
}

#[tokio::test]
async fn test_retry_after_failure_roundtrip() {
    // FAILED -> retry-failed -> SCHEDULED -> mark-queued -> QUEUED -> publish
    let harness = TestHarness::new();
    let ids = harness.insert(vec![fixtures::text_item(ContentStatus::Queued)]);

    harness
        .bridge
        .set_receipt_fn(|post| {
            Some(PublishReceipt {
                content_item_id: post.content_item_id.clone(),
                ok: false,
                published_url: None,
                error: Some("platform outage".to_string()),
            })
        })
        .await;

    harness.runner().dispatch(&ids).await.unwrap();
    assert_eq!(
        harness.store.get(&ids[0]).unwrap().unwrap().status,
        ContentStatus::Failed
    );

    let outcome = soapbox_core::bulk::retry_failed(harness.store.as_ref(), &ids).unwrap();
    assert_eq!(outcome.changed, 1);
    let item = harness.store.get(&ids[0]).unwrap().unwrap();
    assert_eq!(item.status, ContentStatus::Scheduled);
    assert_eq!(item.attempt_count, 2);

    let outcome = soapbox_core::bulk::mark_queued(harness.store.as_ref(), &ids).unwrap();
    assert_eq!(outcome.changed, 1);

    harness.bridge.set_all_ok().await;
    let report = harness.runner().dispatch(&ids).await.unwrap();
    assert_eq!(report.published, 1);

    let item = harness.store.get(&ids[0]).unwrap().unwrap();
    assert_eq!(item.status, ContentStatus::Published);
    assert_eq!(item.attempt_count, 3);
}
