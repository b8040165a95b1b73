//! Brand profiles: scraped website context that feeds the generation prompt.

mod profiler;
mod scraper;
mod store;
mod task;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use profiler::{BrandProfiler, LlmBrandProfiler, ProfileDocument};
pub use scraper::{HttpSiteScraper, ScrapedSite, SiteScraper};
pub use store::{ProfileStore, SqliteProfileStore};
pub use task::{spawn_scrape, ProfileTaskHandle};

/// Scrape/profiling status of a brand profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileStatus {
    Idle,
    Scraping,
    Ready,
    Failed,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Idle => "IDLE",
            ProfileStatus::Scraping => "SCRAPING",
            ProfileStatus::Ready => "READY",
            ProfileStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDLE" => Ok(ProfileStatus::Idle),
            "SCRAPING" => Ok(ProfileStatus::Scraping),
            "READY" => Ok(ProfileStatus::Ready),
            "FAILED" => Ok(ProfileStatus::Failed),
            other => Err(format!("unknown profile status: {}", other)),
        }
    }
}

/// A brand's scraped and distilled profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandProfile {
    pub brand_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    pub status: ProfileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_scraped_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages_scraped: Vec<String>,
    /// Raw scrape text, kept for re-profiling without re-scraping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    /// Structured profile produced by the profiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,
    /// Human-readable summary; this is what the generation prompt consumes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BrandProfile {
    /// A fresh IDLE profile for a brand.
    pub fn new(brand_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            brand_id: brand_id.into(),
            website_url: None,
            status: ProfileStatus::Idle,
            last_error: None,
            last_scraped_at: None,
            pages_scraped: Vec::new(),
            raw_text: None,
            profile: None,
            profile_summary: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Error type for brand profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("brand profile not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("scrape failed: {0}")]
    Scrape(String),

    #[error("profiling failed: {0}")]
    Profiling(String),

    #[error("database error: {0}")]
    Database(String),
}
