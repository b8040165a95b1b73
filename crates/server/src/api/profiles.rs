//! Brand profile handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use soapbox_core::{spawn_scrape, AuditEvent, BrandProfile, ProfileError};

use crate::state::AppState;

use super::middleware::AuthUser;
use super::{error_body, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct ScrapeBody {
    pub website_url: String,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub brand_id: String,
    pub status: String,
}

/// Get a brand's profile.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(brand_id): Path<String>,
) -> Result<Json<BrandProfile>, (StatusCode, Json<ErrorResponse>)> {
    match state.profile_store().get(&brand_id) {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            error_body(format!("brand profile not found: {}", brand_id)),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        )),
    }
}

/// Start a scrape-and-profile run for a brand.
///
/// One run per brand at a time; a second request while one is active is
/// rejected.
pub async fn start_scrape(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(brand_id): Path<String>,
    Json(body): Json<ScrapeBody>,
) -> Result<(StatusCode, Json<ScrapeResponse>), (StatusCode, Json<ErrorResponse>)> {
    let (Some(scraper), Some(profiler)) = (state.scraper(), state.profiler()) else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            error_body("brand profiling is not configured"),
        ));
    };

    let mut tasks = state.profile_tasks().lock().await;
    if let Some(handle) = tasks.get(&brand_id) {
        if !handle.is_finished() {
            return Err((
                StatusCode::CONFLICT,
                error_body(format!("a scrape is already running for {}", brand_id)),
            ));
        }
        tasks.remove(&brand_id);
    }

    let handle = spawn_scrape(
        state.profile_store_arc(),
        scraper,
        profiler,
        brand_id.clone(),
        body.website_url.clone(),
    )
    .await
    .map_err(profile_error)?;

    tasks.insert(brand_id.clone(), handle);
    drop(tasks);

    state.audit().try_emit(AuditEvent::ProfileScrapeStarted {
        user_id,
        brand_id: brand_id.clone(),
        website_url: body.website_url,
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ScrapeResponse {
            brand_id,
            status: "SCRAPING".to_string(),
        }),
    ))
}

/// Cancel a running scrape for a brand.
pub async fn cancel_scrape(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(brand_id): Path<String>,
) -> Result<Json<ScrapeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let handle = state.profile_tasks().lock().await.remove(&brand_id);

    let Some(handle) = handle else {
        return Err((
            StatusCode::NOT_FOUND,
            error_body(format!("no running scrape for {}", brand_id)),
        ));
    };

    handle.cancel().await;

    state.audit().try_emit(AuditEvent::ProfileScrapeCancelled {
        user_id,
        brand_id: brand_id.clone(),
    });

    Ok(Json(ScrapeResponse {
        brand_id,
        status: "FAILED".to_string(),
    }))
}

fn profile_error(e: ProfileError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        ProfileError::NotFound(_) => (StatusCode::NOT_FOUND, error_body(e.to_string())),
        ProfileError::Validation(_) => (StatusCode::BAD_REQUEST, error_body(e.to_string())),
        ProfileError::Scrape(_) | ProfileError::Profiling(_) => {
            (StatusCode::BAD_GATEWAY, error_body(e.to_string()))
        }
        ProfileError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        ),
    }
}
