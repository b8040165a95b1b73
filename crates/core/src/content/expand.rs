//! Topic expansion: fan a list of topics out into content items.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::store::{ContentStore, StoreError};
use super::types::{ContentItem, ContentType};

/// Maximum stored title length; longer topic text is truncated.
const MAX_TITLE_LEN: usize = 300;

/// A batch of topics to expand into content items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicBatch {
    pub topics: Vec<String>,
    pub brand_id: String,
    pub platforms: Vec<String>,
    pub content_types: Vec<ContentType>,
}

#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create one TOPIC_INGESTED item per topic x platform x content type.
///
/// All variants of one topic share a freshly minted `topic_id`. Blank topic
/// strings are dropped rather than failing the batch.
pub fn expand_topics(store: &dyn ContentStore, batch: &TopicBatch) -> Result<usize, ExpandError> {
    if batch.topics.is_empty() {
        return Err(ExpandError::Validation(
            "topics must be a non-empty list".to_string(),
        ));
    }
    if batch.platforms.is_empty() {
        return Err(ExpandError::Validation(
            "platforms must be a non-empty list".to_string(),
        ));
    }
    if batch.content_types.is_empty() {
        return Err(ExpandError::Validation(
            "content_types must be a non-empty list".to_string(),
        ));
    }

    let brand_id = batch.brand_id.trim();
    if brand_id.is_empty() {
        return Err(ExpandError::Validation("brand_id is required".to_string()));
    }

    let mut items = Vec::new();

    for topic in &batch.topics {
        let topic_text = topic.trim();
        if topic_text.is_empty() {
            continue;
        }

        let title: String = topic_text.chars().take(MAX_TITLE_LEN).collect();
        let topic_id = uuid::Uuid::new_v4().to_string();

        for platform in &batch.platforms {
            for content_type in &batch.content_types {
                items.push(ContentItem::new(
                    topic_id.clone(),
                    brand_id,
                    platform.clone(),
                    *content_type,
                    title.clone(),
                ));
            }
        }
    }

    store.insert_batch(&items)?;
    info!(created = items.len(), brand = brand_id, "Expanded topics");

    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentFilter, ContentStatus, SqliteContentStore};

    fn batch(topics: Vec<&str>) -> TopicBatch {
        TopicBatch {
            topics: topics.into_iter().map(String::from).collect(),
            brand_id: "acme".to_string(),
            platforms: vec!["facebook".to_string(), "linkedin".to_string()],
            content_types: vec![ContentType::Text, ContentType::Image],
        }
    }

    #[test]
    fn test_expand_creates_cartesian_product() {
        let store = SqliteContentStore::in_memory().unwrap();
        let created = expand_topics(&store, &batch(vec!["AI for dentists"])).unwrap();

        // 1 topic x 2 platforms x 2 types
        assert_eq!(created, 4);

        let items = store.list(&ContentFilter::new()).unwrap();
        assert_eq!(items.len(), 4);
        assert!(items
            .iter()
            .all(|i| i.status == ContentStatus::TopicIngested));
        // All variants share the topic grouping key.
        let topic_id = &items[0].topic_id;
        assert!(items.iter().all(|i| &i.topic_id == topic_id));
    }

    #[test]
    fn test_expand_multiple_topics_get_distinct_topic_ids() {
        let store = SqliteContentStore::in_memory().unwrap();
        expand_topics(&store, &batch(vec!["first", "second"])).unwrap();

        let items = store.list(&ContentFilter::new()).unwrap();
        let mut topic_ids: Vec<_> = items.iter().map(|i| i.topic_id.clone()).collect();
        topic_ids.sort();
        topic_ids.dedup();
        assert_eq!(topic_ids.len(), 2);
    }

    #[test]
    fn test_blank_topics_are_dropped() {
        let store = SqliteContentStore::in_memory().unwrap();
        let created = expand_topics(&store, &batch(vec!["real topic", "   "])).unwrap();
        assert_eq!(created, 4);
    }

    #[test]
    fn test_empty_lists_rejected() {
        let store = SqliteContentStore::in_memory().unwrap();

        let mut b = batch(vec!["x"]);
        b.topics.clear();
        assert!(matches!(
            expand_topics(&store, &b),
            Err(ExpandError::Validation(_))
        ));

        let mut b = batch(vec!["x"]);
        b.platforms.clear();
        assert!(matches!(
            expand_topics(&store, &b),
            Err(ExpandError::Validation(_))
        ));

        let mut b = batch(vec!["x"]);
        b.content_types.clear();
        assert!(matches!(
            expand_topics(&store, &b),
            Err(ExpandError::Validation(_))
        ));
    }

    #[test]
    fn test_long_topic_is_truncated() {
        let store = SqliteContentStore::in_memory().unwrap();
        let long_topic = "x".repeat(500);
        let mut b = batch(vec![]);
        b.topics = vec![long_topic];
        b.content_types = vec![ContentType::Text];
        b.platforms = vec!["facebook".to_string()];

        expand_topics(&store, &b).unwrap();
        let items = store.list(&ContentFilter::new()).unwrap();
        assert_eq!(items[0].title.as_ref().unwrap().len(), 300);
    }
}
