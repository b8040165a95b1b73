//! Approve/reject handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use soapbox_core::{bulk, AuditEvent, SkippedItem};

use crate::state::AppState;

use super::middleware::AuthUser;
use super::{bulk_error, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub content_item_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectBody {
    pub content_item_ids: Vec<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub approved: usize,
    pub skipped: usize,
    pub skipped_items: Vec<SkippedItem>,
}

#[derive(Debug, Serialize)]
pub struct RejectResponse {
    pub rejected: usize,
    pub skipped: usize,
    pub skipped_items: Vec<SkippedItem>,
}

/// Approve items that are in review.
pub async fn approve(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ApproveBody>,
) -> Result<Json<ApproveResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome = bulk::approve(state.content_store(), &body.content_item_ids)
        .map_err(bulk_error)?;

    state.audit().try_emit(AuditEvent::ItemsApproved {
        user_id,
        approved: outcome.changed as u32,
        skipped: outcome.skipped() as u32,
    });

    Ok(Json(ApproveResponse {
        approved: outcome.changed,
        skipped: outcome.skipped(),
        skipped_items: outcome.skipped_items,
    }))
}

/// Reject items that are in review, with an optional reason.
pub async fn reject(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RejectBody>,
) -> Result<Json<RejectResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome = bulk::reject(
        state.content_store(),
        &body.content_item_ids,
        body.reason.as_deref(),
    )
    .map_err(bulk_error)?;

    state.audit().try_emit(AuditEvent::ItemsRejected {
        user_id,
        rejected: outcome.changed as u32,
        skipped: outcome.skipped() as u32,
        reason: body.reason.clone(),
    });

    Ok(Json(RejectResponse {
        rejected: outcome.changed,
        skipped: outcome.skipped(),
        skipped_items: outcome.skipped_items,
    }))
}
