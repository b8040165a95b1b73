//! Platform registry: the enumerated, extensible set of posting targets.

mod sqlite;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use sqlite::SqlitePlatformRegistry;

/// A social platform content can target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Platform {
    /// Registry id, lowercase (e.g. "facebook").
    pub id: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Error type for platform registry operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform not found: {0}")]
    NotFound(String),

    #[error("platform id already exists: {0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Trait for platform registry backends.
pub trait PlatformRegistry: Send + Sync {
    /// List platforms, optionally only active ones.
    fn list(&self, active_only: bool) -> Result<Vec<Platform>, PlatformError>;

    /// Get one platform by id.
    fn get(&self, id: &str) -> Result<Option<Platform>, PlatformError>;

    /// Register a new platform. The id is normalized to lowercase.
    fn create(&self, id: &str, display_name: &str, is_active: bool)
        -> Result<Platform, PlatformError>;

    /// Update display name and/or active flag.
    fn update(
        &self,
        id: &str,
        display_name: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Platform, PlatformError>;
}
