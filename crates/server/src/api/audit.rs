//! Audit query endpoint.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use soapbox_core::{AuditFilter, AuditRecord};

use crate::state::AppState;

use super::{error_body, ErrorResponse};

/// Maximum allowed limit for audit queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for audit queries
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for audit endpoint
#[derive(Debug, Deserialize)]
pub struct AuditQueryParams {
    /// Filter by brand id
    pub brand_id: Option<String>,
    /// Filter by event type
    pub event_type: Option<String>,
    /// Filter by user id
    pub user_id: Option<String>,
    /// Filter events after this timestamp (ISO 8601)
    pub from: Option<DateTime<Utc>>,
    /// Filter events before this timestamp (ISO 8601)
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response for audit query endpoint
#[derive(Debug, Serialize)]
pub struct AuditQueryResponse {
    pub events: Vec<AuditRecord>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Query audit events
pub async fn query_audit(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditQueryParams>,
) -> Result<Json<AuditQueryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut base_filter = AuditFilter::new();

    if let Some(ref brand_id) = params.brand_id {
        base_filter = base_filter.with_brand_id(brand_id);
    }

    if let Some(ref event_type) = params.event_type {
        base_filter = base_filter.with_event_type(event_type);
    }

    if let Some(ref user_id) = params.user_id {
        base_filter = base_filter.with_user_id(user_id);
    }

    if params.from.is_some() || params.to.is_some() {
        base_filter = base_filter.with_time_range(params.from, params.to);
    }

    let query_filter = AuditFilter {
        limit,
        offset,
        ..base_filter.clone()
    };

    let events = state
        .audit_store()
        .query(&query_filter)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())))?;

    let total = state
        .audit_store()
        .count(&base_filter)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())))?;

    Ok(Json(AuditQueryResponse {
        events,
        total,
        limit,
        offset,
    }))
}
