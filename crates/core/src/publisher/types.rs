//! Publish bridge types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bulk::SkippedItem;
use crate::content::StoreError;

/// One item as sent to the publishing automation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutboundPost {
    pub content_item_id: String,
    pub brand_id: String,
    pub platform: String,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,

    /// Markdown-stripped post text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Per-item outcome returned by the automation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishReceipt {
    pub content_item_id: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of one dispatch call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishReport {
    /// Items actually sent to the automation.
    pub sent: usize,
    /// Items filtered out before sending.
    pub skipped: usize,
    pub skipped_items: Vec<SkippedItem>,
    /// Items confirmed published.
    pub published: usize,
    /// Items the automation reported as failed.
    pub failed: usize,
    /// Items sent but absent from the response. Their outcome is ambiguous:
    /// neither success nor failure is assumed, and their status is untouched.
    pub missing_in_response: Vec<String>,
}

/// Error type for the publish bridge.
///
/// All of these abort the request before any item mutation; per-item
/// failures surface through [`PublishReport`] instead.
#[derive(Debug, Error)]
pub enum PublisherError {
    #[error("{0}")]
    Validation(String),

    #[error("no items found")]
    NotFound,

    #[error("publisher is not configured: {0}")]
    NotConfigured(String),

    /// The automation could not be reached at all.
    #[error("failed to reach publish webhook: {0}")]
    Transport(String),

    /// The automation answered with a non-2xx status.
    #[error("publish webhook rejected request: {status} {body}")]
    Rejected { status: u16, body: String },

    /// The automation answered 2xx but the body was not the expected shape.
    #[error("malformed publish webhook response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
