//! Queue/publish/undo/retry handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use soapbox_core::{bulk, AuditEvent, SkippedItem};

use crate::state::AppState;

use super::middleware::AuthUser;
use super::{bulk_error, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct ItemIdsBody {
    pub content_item_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MarkPublishedBody {
    pub content_item_ids: Vec<String>,
    pub published_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: usize,
    pub skipped: usize,
    pub skipped_items: Vec<SkippedItem>,
}

#[derive(Debug, Serialize)]
pub struct PublishedResponse {
    pub published: usize,
    pub skipped: usize,
    pub skipped_items: Vec<SkippedItem>,
}

#[derive(Debug, Serialize)]
pub struct RevertedResponse {
    pub reverted: usize,
    pub skipped: usize,
    pub skipped_items: Vec<SkippedItem>,
}

#[derive(Debug, Serialize)]
pub struct RetriedResponse {
    pub retried: usize,
    pub skipped: usize,
    pub skipped_items: Vec<SkippedItem>,
}

/// Move SCHEDULED items into the publish queue.
pub async fn mark_queued(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ItemIdsBody>,
) -> Result<Json<QueuedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome =
        bulk::mark_queued(state.content_store(), &body.content_item_ids).map_err(bulk_error)?;

    state.audit().try_emit(AuditEvent::ItemsQueued {
        user_id,
        queued: outcome.changed as u32,
        skipped: outcome.skipped() as u32,
    });

    Ok(Json(QueuedResponse {
        queued: outcome.changed,
        skipped: outcome.skipped(),
        skipped_items: outcome.skipped_items,
    }))
}

/// Confirm publication of QUEUED items.
pub async fn mark_published(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<MarkPublishedBody>,
) -> Result<Json<PublishedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome = bulk::mark_published(
        state.content_store(),
        &body.content_item_ids,
        body.published_url.as_deref(),
    )
    .map_err(bulk_error)?;

    state.audit().try_emit(AuditEvent::ItemsPublished {
        user_id,
        published: outcome.changed as u32,
        skipped: outcome.skipped() as u32,
    });

    Ok(Json(PublishedResponse {
        published: outcome.changed,
        skipped: outcome.skipped(),
        skipped_items: outcome.skipped_items,
    }))
}

/// Pull QUEUED items back to SCHEDULED.
pub async fn undo_queued(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ItemIdsBody>,
) -> Result<Json<RevertedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome =
        bulk::undo_queued(state.content_store(), &body.content_item_ids).map_err(bulk_error)?;

    state.audit().try_emit(AuditEvent::ItemsReverted {
        user_id,
        reverted: outcome.changed as u32,
        skipped: outcome.skipped() as u32,
    });

    Ok(Json(RevertedResponse {
        reverted: outcome.changed,
        skipped: outcome.skipped(),
        skipped_items: outcome.skipped_items,
    }))
}

/// Send FAILED items back to SCHEDULED for another attempt.
pub async fn retry_failed(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ItemIdsBody>,
) -> Result<Json<RetriedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome =
        bulk::retry_failed(state.content_store(), &body.content_item_ids).map_err(bulk_error)?;

    state.audit().try_emit(AuditEvent::ItemsRetried {
        user_id,
        retried: outcome.changed as u32,
        skipped: outcome.skipped() as u32,
    });

    Ok(Json(RetriedResponse {
        retried: outcome.changed,
        skipped: outcome.skipped(),
        skipped_items: outcome.skipped_items,
    }))
}
