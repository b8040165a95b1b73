//! Bulk operation endpoint tests: approve, reject, schedule, queue,
//! publish, undo, retry.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixtures, TestFixture};
use soapbox_core::ContentStatus;

#[tokio::test]
async fn test_approve_endpoint_partial_batch() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![
        fixtures::text_item(ContentStatus::PendingApproval),
        fixtures::text_item(ContentStatus::DraftReady),
        fixtures::text_item(ContentStatus::Scheduled),
    ]);

    let response = fixture
        .post("/api/v1/approvals/approve", json!({ "content_item_ids": ids }))
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["approved"], 2);
    assert_eq!(response.body["skipped"], 1);
    assert_eq!(response.body["skipped_items"][0]["status"], "SCHEDULED");
    assert!(response.body["skipped_items"][0]["reason"]
        .as_str()
        .unwrap()
        .contains("PENDING_APPROVAL/DRAFT_READY"));

    assert_eq!(fixture.item(&ids[0]).status, ContentStatus::Approved);
    assert_eq!(fixture.item(&ids[2]).status, ContentStatus::Scheduled);
}

#[tokio::test]
async fn test_reject_endpoint_records_reason() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![fixtures::text_item(ContentStatus::PendingApproval)]);

    let response = fixture
        .post(
            "/api/v1/approvals/reject",
            json!({ "content_item_ids": ids, "reason": "off brand" }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["rejected"], 1);

    let item = fixture.item(&ids[0]);
    assert_eq!(item.status, ContentStatus::Rejected);
    assert_eq!(item.last_error.as_deref(), Some("off brand"));
}

#[tokio::test]
async fn test_empty_ids_is_400() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .post("/api/v1/approvals/approve", json!({ "content_item_ids": [] }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_ids_is_404() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .post(
            "/api/v1/approvals/approve",
            json!({ "content_item_ids": [uuid::Uuid::new_v4().to_string()] }),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_schedule_bulk_happy_path() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![
        fixtures::text_item(ContentStatus::Approved),
        fixtures::text_item(ContentStatus::Approved),
        fixtures::text_item(ContentStatus::Approved),
        fixtures::text_item(ContentStatus::Approved),
        fixtures::text_item(ContentStatus::Approved),
    ]);

    let response = fixture
        .post(
            "/api/v1/schedule/bulk",
            json!({ "content_item_ids": ids, "scheduled_at": "2026-09-01T10:00:00Z" }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["scheduled"], 5);

    let mut slots = std::collections::HashSet::new();
    for id in &ids {
        let item = fixture.item(id);
        assert_eq!(item.status, ContentStatus::Scheduled);
        slots.insert(item.scheduled_at.unwrap());
    }
    // All five share the same slot.
    assert_eq!(slots.len(), 1);
}

#[tokio::test]
async fn test_schedule_bulk_is_all_or_nothing() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![
        fixtures::text_item(ContentStatus::Approved),
        fixtures::text_item(ContentStatus::Approved),
        fixtures::text_item(ContentStatus::PendingApproval),
        fixtures::text_item(ContentStatus::Approved),
        fixtures::text_item(ContentStatus::Approved),
    ]);

    let response = fixture
        .post(
            "/api/v1/schedule/bulk",
            json!({ "content_item_ids": ids, "scheduled_at": "2026-09-01T10:00:00Z" }),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);

    // Zero items mutated.
    for (idx, id) in ids.iter().enumerate() {
        let expected = if idx == 2 {
            ContentStatus::PendingApproval
        } else {
            ContentStatus::Approved
        };
        assert_eq!(fixture.item(id).status, expected);
        assert!(fixture.item(id).scheduled_at.is_none());
    }
}

#[tokio::test]
async fn test_schedule_bulk_rejects_bad_timestamp() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![fixtures::text_item(ContentStatus::Approved)]);

    let response = fixture
        .post(
            "/api/v1/schedule/bulk",
            json!({ "content_item_ids": ids, "scheduled_at": "next tuesday" }),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(fixture.item(&ids[0]).status, ContentStatus::Approved);
}

#[tokio::test]
async fn test_queue_publish_flow() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![fixtures::text_item(ContentStatus::Scheduled)]);

    let response = fixture
        .post(
            "/api/v1/publishing/mark-queued",
            json!({ "content_item_ids": ids }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["queued"], 1);
    assert_eq!(fixture.item(&ids[0]).status, ContentStatus::Queued);

    let response = fixture
        .post(
            "/api/v1/publishing/mark-published",
            json!({ "content_item_ids": ids, "published_url": "https://facebook.com/p/9" }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["published"], 1);

    let item = fixture.item(&ids[0]);
    assert_eq!(item.status, ContentStatus::Published);
    assert_eq!(item.published_url.as_deref(), Some("https://facebook.com/p/9"));
    assert!(item.published_at.is_some());
}

#[tokio::test]
async fn test_mark_published_twice_skips_not_errors() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![fixtures::text_item(ContentStatus::Queued)]);

    fixture
        .post(
            "/api/v1/publishing/mark-published",
            json!({ "content_item_ids": ids }),
        )
        .await;

    let response = fixture
        .post(
            "/api/v1/publishing/mark-published",
            json!({ "content_item_ids": ids }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["published"], 0);
    assert_eq!(response.body["skipped"], 1);
    assert!(response.body["skipped_items"][0]["reason"]
        .as_str()
        .unwrap()
        .contains("QUEUED"));
    assert_eq!(fixture.item(&ids[0]).status, ContentStatus::Published);
}

#[tokio::test]
async fn test_undo_queued_endpoint() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![
        fixtures::text_item(ContentStatus::Queued),
        fixtures::text_item(ContentStatus::Scheduled),
    ]);

    let response = fixture
        .post(
            "/api/v1/publishing/undo-queued",
            json!({ "content_item_ids": ids }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["reverted"], 1);
    assert_eq!(response.body["skipped"], 1);
    assert_eq!(fixture.item(&ids[0]).status, ContentStatus::Scheduled);
}

#[tokio::test]
async fn test_retry_failed_endpoint() {
    let fixture = TestFixture::new().await;
    let mut failed = fixtures::text_item(ContentStatus::Failed);
    failed.attempt_count = 2;
    failed.last_error = Some("platform outage".to_string());
    let ids = fixture.seed_items(vec![failed]);

    let response = fixture
        .post(
            "/api/v1/publishing/retry-failed",
            json!({ "content_item_ids": ids }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["retried"], 1);

    let item = fixture.item(&ids[0]);
    assert_eq!(item.status, ContentStatus::Scheduled);
    assert_eq!(item.attempt_count, 3);
    assert!(item.last_error.is_none());
}
