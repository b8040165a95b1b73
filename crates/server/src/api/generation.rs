//! Draft and media generation handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use std::sync::Arc;

use soapbox_core::{
    AuditEvent, GenerationError, GenerationReport, GenerationRequest, MediaError, MediaReport,
};

use crate::state::AppState;

use super::middleware::AuthUser;
use super::{error_body, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct MediaBody {
    pub content_item_ids: Vec<String>,
}

/// Generate drafts for selected items (explicit ids, or a mode-based pool).
///
/// When no brand context is supplied, the stored brand profile summary is
/// used automatically.
pub async fn generate_drafts(
    State(state): State<Arc<AppState>>,
    Json(mut request): Json<GenerationRequest>,
) -> Result<Json<GenerationReport>, (StatusCode, Json<ErrorResponse>)> {
    let Some(runner) = state.generation_runner() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            error_body("generator is not configured"),
        ));
    };

    if request.brand_profile_summary.is_none() {
        if let Ok(Some(profile)) = state.profile_store().get(&request.brand_id) {
            request.brand_profile_summary = profile.profile_summary;
        }
    }

    let report = runner.run(&request).await.map_err(generation_error)?;
    Ok(Json(report))
}

/// Generate media for selected image/video items.
pub async fn generate_media(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<MediaBody>,
) -> Result<Json<MediaReport>, (StatusCode, Json<ErrorResponse>)> {
    let Some(runner) = state.media_runner() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            error_body("media generator is not configured"),
        ));
    };

    let report = runner
        .run(&body.content_item_ids)
        .await
        .map_err(media_error)?;

    state.audit().try_emit(AuditEvent::MediaGenerated {
        user_id,
        generated: report.generated as u32,
        failed: report.failed as u32,
        skipped: report.skipped as u32,
    });

    Ok(Json(report))
}

fn generation_error(e: GenerationError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        GenerationError::Validation(_) => (StatusCode::BAD_REQUEST, error_body(e.to_string())),
        GenerationError::NotFound => (StatusCode::NOT_FOUND, error_body(e.to_string())),
        GenerationError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        ),
    }
}

fn media_error(e: MediaError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        MediaError::Validation(_) => (StatusCode::BAD_REQUEST, error_body(e.to_string())),
        MediaError::NotFound => (StatusCode::NOT_FOUND, error_body(e.to_string())),
        MediaError::Transport(_) | MediaError::Rejected { .. } | MediaError::Malformed(_) => {
            (StatusCode::BAD_GATEWAY, error_body(e.to_string()))
        }
        MediaError::NotConfigured(_) | MediaError::Upload(_) | MediaError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        ),
    }
}
