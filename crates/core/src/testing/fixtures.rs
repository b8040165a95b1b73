//! Content item fixtures.

use crate::content::{ContentItem, ContentStatus, ContentType};

/// A text item in the given status, with a plausible body.
pub fn text_item(status: ContentStatus) -> ContentItem {
    let mut item = ContentItem::new(
        uuid::Uuid::new_v4().to_string(),
        "acme",
        "facebook",
        ContentType::Text,
        "Why small teams ship faster",
    );
    item.status = status;
    item.body_text = Some("Small teams ship faster. Here's why.".to_string());
    item.hashtags = Some("#startups #shipping".to_string());
    item
}

/// An image item in the given status, with media attached.
pub fn image_item(status: ContentStatus) -> ContentItem {
    let mut item = ContentItem::new(
        uuid::Uuid::new_v4().to_string(),
        "acme",
        "instagram",
        ContentType::Image,
        "Office move announcement",
    );
    item.status = status;
    item.body_text = Some("We moved!".to_string());
    item.media_url = Some("https://cdn.example.com/office.png".to_string());
    item
}

/// A fresh TOPIC_INGESTED item for the given platform and type.
pub fn ingested_item(platform: &str, content_type: ContentType) -> ContentItem {
    ContentItem::new(
        uuid::Uuid::new_v4().to_string(),
        "acme",
        platform,
        content_type,
        "Why small teams ship faster",
    )
}
