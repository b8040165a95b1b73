//! Media generation types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bulk::SkippedItem;
use crate::content::StoreError;

/// What the media generator needs for one item.
#[derive(Debug, Clone, Serialize)]
pub struct MediaRequest {
    pub content_item_id: String,
    pub brand_id: String,
    pub platform: String,
    /// "image" or "video".
    pub content_type: String,
    pub prompt: String,
}

/// What a media generator hands back: either an already-hosted URL, or raw
/// bytes the caller must upload to the object store itself.
#[derive(Debug, Clone)]
pub enum MediaAsset {
    Hosted {
        media_url: String,
        thumbnail_url: Option<String>,
    },
    Bytes {
        data: Vec<u8>,
        content_type: String,
    },
}

/// Outcome of a media generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaReport {
    pub generated: usize,
    pub failed: usize,
    pub skipped: usize,
    pub skipped_items: Vec<SkippedItem>,
}

/// Error type for media generation and object storage.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0}")]
    Validation(String),

    #[error("no items found")]
    NotFound,

    #[error("media generator is not configured: {0}")]
    NotConfigured(String),

    #[error("failed to reach media webhook: {0}")]
    Transport(String),

    #[error("media webhook rejected request: {status} {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed media webhook response: {0}")]
    Malformed(String),

    #[error("object store upload failed: {0}")]
    Upload(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Hosted-URL response shape from the media webhook.
#[derive(Debug, Deserialize)]
pub struct MediaUrlResponse {
    pub media_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}
