//! General API surface tests: health, config, topics, content listing,
//! generation, platforms, stats, audit.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixtures, TestFixture};
use soapbox_core::{ContentStatus, ContentType};

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["auth"]["method"], "none");
    // No raw secrets anywhere in the body.
    assert!(!serde_json::to_string(&response.body)
        .unwrap()
        .contains("api_key\":"));
}

#[tokio::test]
async fn test_topic_expansion_endpoint() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/topics",
            json!({
                "topics": ["AI for dentists", "Why small teams win"],
                "brand_id": "acme",
                "platforms": ["facebook", "linkedin"],
                "content_types": ["text", "image"]
            }),
        )
        .await;

    assert_status!(response, StatusCode::CREATED);
    // 2 topics x 2 platforms x 2 types
    assert_eq!(response.body["content_items_created"], 8);

    let response = fixture.get("/api/v1/content?status=TOPIC_INGESTED").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 8);
}

#[tokio::test]
async fn test_topic_expansion_validates_input() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/topics",
            json!({
                "topics": [],
                "brand_id": "acme",
                "platforms": ["facebook"],
                "content_types": ["text"]
            }),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_content_listing_filters() {
    let fixture = TestFixture::new().await;
    fixture.seed_items(vec![
        fixtures::text_item(ContentStatus::PendingApproval),
        fixtures::image_item(ContentStatus::PendingApproval),
        fixtures::text_item(ContentStatus::Approved),
    ]);

    let response = fixture
        .get("/api/v1/content?status=PENDING_APPROVAL&content_type=image")
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 1);
    assert_eq!(response.body["items"][0]["content_type"], "image");

    let response = fixture.get("/api/v1/content?status=APPROVED").await;
    assert_eq!(response.body["total"], 1);
}

#[tokio::test]
async fn test_content_listing_rejects_unknown_status() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/content?status=LIMBO").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_content_get_by_id() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![fixtures::text_item(ContentStatus::DraftReady)]);

    let response = fixture.get(&format!("/api/v1/content/{}", ids[0])).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["id"], ids[0].as_str());
    assert_eq!(response.body["status"], "DRAFT_READY");

    let response = fixture.get("/api/v1/content/does-not-exist").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generation_endpoint_drives_items_to_review() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![
        fixtures::ingested_item("facebook", ContentType::Text),
        fixtures::ingested_item("linkedin", ContentType::Text),
    ]);

    let response = fixture
        .post(
            "/api/v1/generation/drafts",
            json!({ "content_item_ids": ids, "brand_id": "acme" }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["generated"], 2);
    assert_eq!(response.body["failed"], 0);

    for id in &ids {
        assert_eq!(fixture.item(id).status, ContentStatus::PendingApproval);
    }
}

#[tokio::test]
async fn test_generation_media_unconfigured_is_503() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![fixtures::ingested_item("instagram", ContentType::Image)]);

    let response = fixture
        .post(
            "/api/v1/generation/media",
            json!({ "content_item_ids": ids }),
        )
        .await;

    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_platform_registry_endpoints() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/platforms").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 3);

    let response = fixture
        .post(
            "/api/v1/platforms",
            json!({ "id": "TikTok", "display_name": "TikTok" }),
        )
        .await;
    assert_status!(response, StatusCode::CREATED);
    assert_eq!(response.body["id"], "tiktok");

    let response = fixture
        .patch("/api/v1/platforms/tiktok", json!({ "is_active": false }))
        .await;
    assert_status!(response, StatusCode::OK);

    let response = fixture.get("/api/v1/platforms?active_only=true").await;
    assert!(!response
        .body
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"] == "tiktok"));

    let response = fixture
        .post(
            "/api/v1/platforms",
            json!({ "id": "facebook", "display_name": "Facebook" }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_overview() {
    let fixture = TestFixture::new().await;
    fixture.seed_items(vec![
        fixtures::text_item(ContentStatus::Queued),
        fixtures::text_item(ContentStatus::Queued),
        fixtures::image_item(ContentStatus::Failed),
    ]);

    let response = fixture.get("/api/v1/stats/overview").await;
    assert_status!(response, StatusCode::OK);

    let by_status = response.body["by_status"].as_array().unwrap();
    assert!(by_status
        .iter()
        .any(|row| row["status"] == "QUEUED" && row["count"] == 2));
    assert!(by_status
        .iter()
        .any(|row| row["status"] == "FAILED" && row["count"] == 1));

    let by_platform = response.body["by_platform"].as_array().unwrap();
    assert!(by_platform
        .iter()
        .any(|row| row["platform"] == "facebook" && row["count"] == 2));
}

#[tokio::test]
async fn test_audit_records_bulk_operations() {
    let fixture = TestFixture::new().await;
    let ids = fixture.seed_items(vec![fixtures::text_item(ContentStatus::PendingApproval)]);

    fixture
        .post("/api/v1/approvals/approve", json!({ "content_item_ids": ids }))
        .await;

    // The audit writer runs on a background task.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let response = fixture.get("/api/v1/audit?event_type=items_approved").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 1);
    assert_eq!(response.body["events"][0]["data"]["approved"], 1);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_prometheus_text() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/v1/health").await;

    let response = fixture.get("/api/v1/metrics").await;
    assert_status!(response, StatusCode::OK);
    // The body is Prometheus text, not JSON, so it lands as Null in the
    // parsed view; status is what matters here.
}

#[tokio::test]
async fn test_profile_endpoints_without_profiler() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/profiles/acme").await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let response = fixture
        .post(
            "/api/v1/profiles/acme/scrape",
            json!({ "website_url": "https://acme.example.com" }),
        )
        .await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
}
