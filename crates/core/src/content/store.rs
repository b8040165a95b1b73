//! Content storage trait.

use thiserror::Error;

use super::types::{ContentFilter, ContentItem};

/// Error type for content store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content item not found: {0}")]
    NotFound(String),

    /// A persisted row no longer parses into the domain model. A status
    /// outside the taxonomy is a data-corruption bug, never something to
    /// repair silently.
    #[error("corrupt row {id}: {detail}")]
    Corrupt { id: String, detail: String },

    #[error("database error: {0}")]
    Database(String),
}

/// Trait for content item storage backends.
pub trait ContentStore: Send + Sync {
    /// Insert a batch of freshly expanded items in one transaction.
    fn insert_batch(&self, items: &[ContentItem]) -> Result<(), StoreError>;

    /// Get an item by id.
    fn get(&self, id: &str) -> Result<Option<ContentItem>, StoreError>;

    /// Resolve a list of ids to stored items. Unknown ids are simply absent
    /// from the result; callers decide whether that matters.
    fn get_many(&self, ids: &[String]) -> Result<Vec<ContentItem>, StoreError>;

    /// List items matching the filter, newest updates first.
    fn list(&self, filter: &ContentFilter) -> Result<Vec<ContentItem>, StoreError>;

    /// Count items matching the filter.
    fn count(&self, filter: &ContentFilter) -> Result<i64, StoreError>;

    /// Persist a single mutated item, refreshing `updated_at`.
    fn update(&self, item: &ContentItem) -> Result<(), StoreError>;

    /// Persist a batch of mutated items in one transaction. This is the bulk
    /// handlers' single-commit-per-request flush.
    fn update_batch(&self, items: &[ContentItem]) -> Result<(), StoreError>;

    /// Item counts grouped by status.
    fn counts_by_status(&self) -> Result<Vec<(String, i64)>, StoreError>;

    /// Item counts grouped by platform.
    fn counts_by_platform(&self) -> Result<Vec<(String, i64)>, StoreError>;

    /// Item counts grouped by brand.
    fn counts_by_brand(&self) -> Result<Vec<(String, i64)>, StoreError>;
}
