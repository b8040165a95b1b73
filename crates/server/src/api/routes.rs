use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{
    approvals, audit, bridge, content, generation, handlers, platforms, profiles, publishing,
    schedule, stats, topics,
    middleware::{auth_middleware, metrics_middleware},
};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config, metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Audit
        .route("/audit", get(audit::query_audit))
        // Stats
        .route("/stats/overview", get(stats::overview))
        // Topic intake
        .route("/topics", post(topics::create_topics))
        // Content
        .route("/content", get(content::list_content))
        .route("/content/{id}", get(content::get_content))
        // Approvals
        .route("/approvals/approve", post(approvals::approve))
        .route("/approvals/reject", post(approvals::reject))
        // Scheduling
        .route("/schedule/bulk", post(schedule::bulk_schedule))
        // Publishing lifecycle
        .route("/publishing/mark-queued", post(publishing::mark_queued))
        .route("/publishing/mark-published", post(publishing::mark_published))
        .route("/publishing/undo-queued", post(publishing::undo_queued))
        .route("/publishing/retry-failed", post(publishing::retry_failed))
        // Publish bridge (outbound webhook)
        .route("/bridge/publish", post(bridge::publish))
        // Generation
        .route("/generation/drafts", post(generation::generate_drafts))
        .route("/generation/media", post(generation::generate_media))
        // Platform registry
        .route("/platforms", get(platforms::list_platforms))
        .route("/platforms", post(platforms::create_platform))
        .route("/platforms/{id}", patch(platforms::update_platform))
        // Brand profiles
        .route("/profiles/{brand_id}", get(profiles::get_profile))
        .route("/profiles/{brand_id}/scrape", post(profiles::start_scrape))
        .route("/profiles/{brand_id}/cancel", post(profiles::cancel_scrape))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ))
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
