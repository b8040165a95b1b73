//! Bulk lifecycle operations.
//!
//! Each operation resolves a list of content item ids, applies an
//! operation-specific precondition plus the transition-table check, mutates
//! the items that qualify, and reports a skip reason for each item that does
//! not. Items are evaluated independently; one item's failure never blocks
//! the rest. The exception is [`handlers::schedule`], which is all-or-nothing
//! by design.
//!
//! Mutations are collected in memory and flushed with a single store commit
//! at the end of each operation.

mod handlers;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{ContentStatus, StoreError};

pub use handlers::{
    approve, mark_published, mark_queued, reject, retry_failed, schedule, undo_queued,
};

/// An item an operation declined to touch, and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedItem {
    pub id: String,
    pub status: ContentStatus,
    pub reason: String,
}

/// Per-operation result: how many items changed, and what was skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub changed: usize,
    pub skipped_items: Vec<SkippedItem>,
}

impl BulkOutcome {
    pub fn skipped(&self) -> usize {
        self.skipped_items.len()
    }
}

/// Error type for bulk operations. These abort the whole request before any
/// mutation; per-item problems become [`SkippedItem`]s instead.
#[derive(Debug, Error)]
pub enum BulkError {
    /// Malformed request, rejected before any lookup.
    #[error("{0}")]
    Validation(String),

    /// No matching items found.
    #[error("no items found")]
    NotFound,

    /// Bulk schedule refuses the entire batch when any item is ineligible.
    #[error("item {id} must be APPROVED to schedule (status: {status})")]
    NotSchedulable { id: String, status: ContentStatus },

    #[error(transparent)]
    Store(#[from] StoreError),
}
