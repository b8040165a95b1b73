//! Core content data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lifecycle::ContentStatus;

/// What kind of post an item produces. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Image,
    Video,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Text, ContentType::Image, ContentType::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Video => "video",
        }
    }

    /// Returns true for types that carry a media payload.
    pub fn is_media(&self) -> bool {
        matches!(self, ContentType::Image | ContentType::Video)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ContentType::Text),
            "image" => Ok(ContentType::Image),
            "video" => Ok(ContentType::Video),
            other => Err(format!("invalid content_type: {}", other)),
        }
    }
}

/// One piece of content at one point in its lifecycle.
///
/// Created by topic expansion (one row per topic x platform x content type)
/// and mutated only through the bulk handlers, the generation runner, or the
/// publish runner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    /// Unique identifier (UUID).
    pub id: String,

    /// Grouping key shared by all variants spawned from one topic.
    pub topic_id: String,

    pub brand_id: String,

    /// Platform registry id (e.g. "facebook", "linkedin").
    pub platform: String,

    /// Immutable after creation.
    pub content_type: ContentType,

    pub status: ContentStatus,

    /// Topic text at creation; editable before approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Generated caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<String>,

    // Media payload (image/video items only), populated by the media
    // pipeline, never by direct user input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_urls: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_caption: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_provider: Option<String>,

    /// Set only by bulk schedule (APPROVED -> SCHEDULED).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,

    /// Set only on transition to PUBLISHED.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_url: Option<String>,

    /// Non-null only after a failure or rejection; cleared by the next
    /// successful transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,

    /// Incremented on each publish/retry attempt. Never decreases.
    #[serde(default)]
    pub attempt_count: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// A fresh TOPIC_INGESTED item for one topic/platform/type combination.
    ///
    /// Image/video items get `media_type` pre-set so consumers can see the
    /// intent before any media exists.
    pub fn new(
        topic_id: impl Into<String>,
        brand_id: impl Into<String>,
        platform: impl Into<String>,
        content_type: ContentType,
        title: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            topic_id: topic_id.into(),
            brand_id: brand_id.into(),
            platform: platform.into(),
            content_type,
            status: ContentStatus::TopicIngested,
            title: Some(title.into()),
            body_text: None,
            hashtags: None,
            media_type: content_type
                .is_media()
                .then(|| content_type.as_str().to_string()),
            media_url: None,
            media_urls: Vec::new(),
            media_caption: None,
            thumbnail_url: None,
            media_provider: None,
            scheduled_at: None,
            published_at: None,
            published_url: None,
            last_error: None,
            attempt_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the item carries everything the publish bridge needs:
    /// non-empty text for text posts, at least one media URL otherwise.
    pub fn has_publishable_payload(&self) -> bool {
        match self.content_type {
            ContentType::Text => self
                .body_text
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty()),
            ContentType::Image | ContentType::Video => {
                self.media_url.is_some() || !self.media_urls.is_empty()
            }
        }
    }
}

/// Filter for querying content items.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub status: Option<ContentStatus>,
    pub brand_id: Option<String>,
    pub platform: Option<String>,
    pub content_type: Option<ContentType>,
    pub topic_id: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self {
            status: None,
            brand_id: None,
            platform: None,
            content_type: None,
            topic_id: None,
            limit: 100,
            offset: 0,
        }
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_brand(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_topic(mut self, topic_id: impl Into<String>) -> Self {
        self.topic_id = Some(topic_id.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}
