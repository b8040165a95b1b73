//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Bulk lifecycle operations (approve, schedule, queue, publish, retry)
//! - Generation runner (drafts, media)
//! - Publish bridge (dispatches, reconciliation outcomes)
//! - External services (LLM, webhooks, object store)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Bulk operations
// =============================================================================

/// Items changed/skipped per bulk operation.
pub static BULK_ITEMS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("soapbox_bulk_items_total", "Items touched by bulk operations"),
        &["op", "result"], // result: "changed", "skipped"
    )
    .unwrap()
});

// =============================================================================
// Generation
// =============================================================================

/// Draft generation attempts by result.
pub static GENERATION_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "soapbox_generation_attempts_total",
            "Total draft generation attempts",
        ),
        &["result"], // "generated", "failed", "skipped"
    )
    .unwrap()
});

/// Duration of a single generator call.
pub static GENERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "soapbox_generation_duration_seconds",
            "Duration of generator calls",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["content_type"],
    )
    .unwrap()
});

/// Media generation attempts by result.
pub static MEDIA_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "soapbox_media_attempts_total",
            "Total media generation attempts",
        ),
        &["result"], // "generated", "failed", "skipped"
    )
    .unwrap()
});

// =============================================================================
// Publish bridge
// =============================================================================

/// Batches dispatched to the publish webhook.
pub static PUBLISH_DISPATCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "soapbox_publish_dispatches_total",
            "Batches sent to the publish webhook",
        ),
        &["result"], // "ok", "transport_error", "rejected"
    )
    .unwrap()
});

/// Per-item reconciliation outcomes.
pub static PUBLISH_ITEMS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "soapbox_publish_items_total",
            "Per-item publish reconciliation outcomes",
        ),
        &["result"], // "published", "failed", "missing", "skipped"
    )
    .unwrap()
});

// =============================================================================
// External services
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "soapbox_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 90.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "soapbox_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// LLM tokens used.
pub static LLM_TOKENS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("soapbox_llm_tokens_total", "Total LLM tokens used"),
        &["provider", "direction"], // direction: "input", "output"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BULK_ITEMS.clone()),
        Box::new(GENERATION_ATTEMPTS.clone()),
        Box::new(GENERATION_DURATION.clone()),
        Box::new(MEDIA_ATTEMPTS.clone()),
        Box::new(PUBLISH_DISPATCHES.clone()),
        Box::new(PUBLISH_ITEMS.clone()),
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
        Box::new(LLM_TOKENS.clone()),
    ]
}
