//! Generation request/response types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bulk::SkippedItem;
use crate::content::{ContentType, StoreError};

use super::llm::LlmError;

/// What the generator needs to draft one item.
#[derive(Debug, Clone)]
pub struct DraftRequest {
    pub topic_text: String,
    pub platform: String,
    pub brand_id: String,
    pub content_type: ContentType,
    /// Brand profile summary, when one exists.
    pub brand_context: Option<String>,
}

/// Structured generator output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedDraft {
    pub body_text: String,
    #[serde(default)]
    pub hashtags: Option<String>,
    /// Image/video prompt for media items.
    #[serde(default)]
    pub media_prompt: Option<String>,
}

/// Error type for draft generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model responded, but not with the JSON shape we asked for.
    #[error("malformed generator response: {0}")]
    Malformed(String),
}

/// Which pool of items to draft when no explicit ids are given.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Fresh items (TOPIC_INGESTED).
    New,
    /// Previously rejected items (REJECTED).
    Rejected,
}

/// Selection + context for a generation run.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub content_item_ids: Option<Vec<String>>,
    #[serde(default)]
    pub mode: Option<GenerationMode>,
    pub brand_id: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    /// Scraped brand profile summary, forwarded into the prompt.
    #[serde(default)]
    pub brand_profile_summary: Option<String>,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub generated: usize,
    pub failed: usize,
    pub skipped: usize,
    pub skipped_items: Vec<SkippedItem>,
}

/// Request-level errors for a generation run. Per-item generator failures do
/// not land here; they mark the item FAILED and the run continues.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),

    #[error("no items found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}
