//! Publish bridge handler: dispatch QUEUED items to the automation webhook.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use std::sync::Arc;

use soapbox_core::{AuditEvent, PublishReport, PublisherError};

use crate::state::AppState;

use super::middleware::AuthUser;
use super::{error_body, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct PublishBody {
    pub content_item_ids: Vec<String>,
}

/// Send QUEUED items to the publishing automation and reconcile the
/// per-item results it returns.
pub async fn publish(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<PublishBody>,
) -> Result<Json<PublishReport>, (StatusCode, Json<ErrorResponse>)> {
    let Some(runner) = state.publish_runner() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            error_body("publisher is not configured"),
        ));
    };

    let report = runner
        .dispatch(&body.content_item_ids)
        .await
        .map_err(publisher_error)?;

    state.audit().try_emit(AuditEvent::PublishDispatched {
        user_id,
        sent: report.sent as u32,
        skipped: report.skipped as u32,
    });

    Ok(Json(report))
}

fn publisher_error(e: PublisherError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        PublisherError::Validation(_) => (StatusCode::BAD_REQUEST, error_body(e.to_string())),
        PublisherError::NotFound => (StatusCode::NOT_FOUND, error_body(e.to_string())),
        PublisherError::NotConfigured(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        ),
        // The automation could not be reached or refused the batch; nothing
        // was mutated.
        PublisherError::Transport(_)
        | PublisherError::Rejected { .. }
        | PublisherError::Malformed(_) => (StatusCode::BAD_GATEWAY, error_body(e.to_string())),
        PublisherError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        ),
    }
}
