//! HTTP API surface.

pub mod approvals;
pub mod audit;
pub mod bridge;
pub mod content;
pub mod generation;
pub mod handlers;
pub mod middleware;
pub mod platforms;
pub mod profiles;
pub mod publishing;
pub mod routes;
pub mod schedule;
pub mod stats;
pub mod topics;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use soapbox_core::BulkError;

pub use routes::create_router;

/// Error response body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn error_body(message: impl Into<String>) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: message.into(),
    })
}

/// Map a bulk-operation error to an HTTP response.
pub(crate) fn bulk_error(e: BulkError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        BulkError::Validation(_) => (StatusCode::BAD_REQUEST, error_body(e.to_string())),
        BulkError::NotFound => (StatusCode::NOT_FOUND, error_body(e.to_string())),
        BulkError::NotSchedulable { .. } => (StatusCode::BAD_REQUEST, error_body(e.to_string())),
        BulkError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        ),
    }
}
