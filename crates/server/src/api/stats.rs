//! Pipeline overview stats.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

use super::{error_body, ErrorResponse};

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct PlatformCount {
    pub platform: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct BrandCount {
    pub brand_id: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub by_status: Vec<StatusCount>,
    pub by_platform: Vec<PlatformCount>,
    pub by_brand: Vec<BrandCount>,
}

/// Item counts grouped by status, platform, and brand.
pub async fn overview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OverviewResponse>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.content_store();

    let by_status = store
        .counts_by_status()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())))?
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();

    let by_platform = store
        .counts_by_platform()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())))?
        .into_iter()
        .map(|(platform, count)| PlatformCount { platform, count })
        .collect();

    let by_brand = store
        .counts_by_brand()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, error_body(e.to_string())))?
        .into_iter()
        .map(|(brand_id, count)| BrandCount { brand_id, count })
        .collect();

    Ok(Json(OverviewResponse {
        by_status,
        by_platform,
        by_brand,
    }))
}
