//! Bulk schedule handler.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use soapbox_core::{bulk, AuditEvent};

use crate::state::AppState;

use super::middleware::AuthUser;
use super::{bulk_error, error_body, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct BulkScheduleBody {
    pub content_item_ids: Vec<String>,
    /// ISO 8601 timestamp ('Z' suffix supported)
    pub scheduled_at: String,
}

#[derive(Debug, Serialize)]
pub struct BulkScheduleResponse {
    pub scheduled: usize,
    pub scheduled_at: String,
}

/// Schedule a batch of APPROVED items. All-or-nothing: any ineligible item
/// fails the whole request with no partial effect.
pub async fn bulk_schedule(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<BulkScheduleBody>,
) -> Result<Json<BulkScheduleResponse>, (StatusCode, Json<ErrorResponse>)> {
    let scheduled_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&body.scheduled_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                error_body("scheduled_at must be an ISO datetime string"),
            )
        })?;

    let outcome = bulk::schedule(state.content_store(), &body.content_item_ids, scheduled_at)
        .map_err(bulk_error)?;

    state.audit().try_emit(AuditEvent::BatchScheduled {
        user_id,
        scheduled: outcome.changed as u32,
        scheduled_at: scheduled_at.to_rfc3339(),
    });

    Ok(Json(BulkScheduleResponse {
        scheduled: outcome.changed,
        scheduled_at: scheduled_at.to_rfc3339(),
    }))
}
