//! Platform registry handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use soapbox_core::{AuditEvent, Platform, PlatformError};

use crate::state::AppState;

use super::middleware::AuthUser;
use super::{error_body, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct ListPlatformsParams {
    /// Only active platforms (default true)
    pub active_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlatformBody {
    pub id: String,
    pub display_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlatformBody {
    pub display_name: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn list_platforms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListPlatformsParams>,
) -> Result<Json<Vec<Platform>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .platforms()
        .list(params.active_only.unwrap_or(true))
        .map(Json)
        .map_err(platform_error)
}

pub async fn create_platform(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreatePlatformBody>,
) -> Result<(StatusCode, Json<Platform>), (StatusCode, Json<ErrorResponse>)> {
    let platform = state
        .platforms()
        .create(&body.id, &body.display_name, body.is_active)
        .map_err(platform_error)?;

    state.audit().try_emit(AuditEvent::PlatformCreated {
        user_id,
        platform_id: platform.id.clone(),
    });

    Ok((StatusCode::CREATED, Json(platform)))
}

pub async fn update_platform(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(platform_id): Path<String>,
    Json(body): Json<UpdatePlatformBody>,
) -> Result<Json<Platform>, (StatusCode, Json<ErrorResponse>)> {
    let platform = state
        .platforms()
        .update(&platform_id, body.display_name.as_deref(), body.is_active)
        .map_err(platform_error)?;

    state.audit().try_emit(AuditEvent::PlatformUpdated {
        user_id,
        platform_id: platform.id.clone(),
    });

    Ok(Json(platform))
}

fn platform_error(e: PlatformError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        PlatformError::NotFound(_) => (StatusCode::NOT_FOUND, error_body(e.to_string())),
        PlatformError::AlreadyExists(_) | PlatformError::Validation(_) => {
            (StatusCode::BAD_REQUEST, error_body(e.to_string()))
        }
        PlatformError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        ),
    }
}
