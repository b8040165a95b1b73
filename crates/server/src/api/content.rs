//! Content listing handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use soapbox_core::{ContentFilter, ContentItem, ContentStatus, ContentType};

use crate::state::AppState;

use super::{error_body, ErrorResponse};

/// Maximum allowed limit for content queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for content queries
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for listing content items
#[derive(Debug, Deserialize)]
pub struct ListContentParams {
    /// Filter by lifecycle status
    pub status: Option<String>,
    pub brand_id: Option<String>,
    pub platform: Option<String>,
    pub content_type: Option<String>,
    pub topic_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response for listing content items
#[derive(Debug, Serialize)]
pub struct ListContentResponse {
    pub items: Vec<ContentItem>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// List content items with optional filters
pub async fn list_content(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListContentParams>,
) -> Result<Json<ListContentResponse>, (StatusCode, Json<ErrorResponse>)> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut filter = ContentFilter::new().with_limit(limit).with_offset(offset);

    if let Some(ref status) = params.status {
        let status: ContentStatus = status
            .parse()
            .map_err(|e| (StatusCode::BAD_REQUEST, error_body(format!("{}", e))))?;
        filter = filter.with_status(status);
    }

    if let Some(ref content_type) = params.content_type {
        let content_type: ContentType = content_type
            .parse()
            .map_err(|e: String| (StatusCode::BAD_REQUEST, error_body(e)))?;
        filter = filter.with_content_type(content_type);
    }

    if let Some(ref brand_id) = params.brand_id {
        filter = filter.with_brand(brand_id);
    }

    if let Some(ref platform) = params.platform {
        filter = filter.with_platform(platform);
    }

    if let Some(ref topic_id) = params.topic_id {
        filter = filter.with_topic(topic_id);
    }

    let items = state
        .content_store()
        .list(&filter)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())))?;

    let count_filter = ContentFilter {
        limit: i64::MAX,
        offset: 0,
        ..filter
    };
    let total = state
        .content_store()
        .count(&count_filter)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())))?;

    Ok(Json(ListContentResponse {
        items,
        total,
        limit,
        offset,
    }))
}

/// Get a content item by id
pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ContentItem>, impl IntoResponse> {
    match state.content_store().get(&id) {
        Ok(Some(item)) => Ok(Json(item)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            error_body(format!("Content item not found: {}", id)),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        )),
    }
}
