//! Topic intake handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use soapbox_core::{expand_topics, AuditEvent, ExpandError, TopicBatch};

use crate::state::AppState;

use super::middleware::AuthUser;
use super::{error_body, ErrorResponse};

#[derive(Debug, Serialize)]
pub struct CreateTopicsResponse {
    pub content_items_created: usize,
}

/// Expand a batch of topics into content items.
pub async fn create_topics(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(batch): Json<TopicBatch>,
) -> Result<(StatusCode, Json<CreateTopicsResponse>), (StatusCode, Json<ErrorResponse>)> {
    let created = expand_topics(state.content_store(), &batch).map_err(|e| match e {
        ExpandError::Validation(_) => (StatusCode::BAD_REQUEST, error_body(e.to_string())),
        ExpandError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        ),
    })?;

    state
        .audit()
        .try_emit(AuditEvent::TopicsIngested {
            user_id,
            brand_id: batch.brand_id.clone(),
            topics: batch.topics.len() as u32,
            items_created: created as u32,
        });

    Ok((
        StatusCode::CREATED,
        Json(CreateTopicsResponse {
            content_items_created: created,
        }),
    ))
}
