//! Mock media generator and object store for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::media::{MediaAsset, MediaError, MediaGenerator, MediaRequest, ObjectStore};

/// Mock implementation of the [`MediaGenerator`] trait.
pub struct MockMediaGenerator {
    /// Bytes mode: return raw bytes instead of a hosted URL.
    return_bytes: Arc<RwLock<bool>>,
    requests: Arc<RwLock<Vec<MediaRequest>>>,
    next_error: Arc<RwLock<Option<String>>>,
}

impl Default for MockMediaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMediaGenerator {
    pub fn new() -> Self {
        Self {
            return_bytes: Arc::new(RwLock::new(false)),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Make subsequent calls return raw bytes (exercising the object-store
    /// upload path) instead of a hosted URL.
    pub async fn set_return_bytes(&self, return_bytes: bool) {
        *self.return_bytes.write().await = return_bytes;
    }

    pub async fn set_next_error(&self, message: &str) {
        *self.next_error.write().await = Some(message.to_string());
    }

    pub async fn recorded_requests(&self) -> Vec<MediaRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl MediaGenerator for MockMediaGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &MediaRequest) -> Result<MediaAsset, MediaError> {
        self.requests.write().await.push(request.clone());

        if let Some(message) = self.next_error.write().await.take() {
            return Err(MediaError::Transport(message));
        }

        if *self.return_bytes.read().await {
            return Ok(MediaAsset::Bytes {
                data: vec![0x89, 0x50, 0x4e, 0x47],
                content_type: "image/png".to_string(),
            });
        }

        Ok(MediaAsset::Hosted {
            media_url: format!(
                "https://media.example.com/{}.png",
                request.content_item_id
            ),
            thumbnail_url: None,
        })
    }
}

/// Mock implementation of the [`ObjectStore`] trait.
pub struct MockObjectStore {
    uploads: Arc<RwLock<Vec<(usize, String)>>>,
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            uploads: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Recorded uploads as (byte length, content type).
    pub async fn uploads(&self) -> Vec<(usize, String)> {
        self.uploads.read().await.clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    fn provider(&self) -> &str {
        "mock-store"
    }

    async fn put(&self, data: Vec<u8>, content_type: &str) -> Result<String, MediaError> {
        let mut uploads = self.uploads.write().await;
        uploads.push((data.len(), content_type.to_string()));
        Ok(format!("https://cdn.example.com/u/{}", uploads.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MediaRequest {
        MediaRequest {
            content_item_id: "item-1".to_string(),
            brand_id: "acme".to_string(),
            platform: "instagram".to_string(),
            content_type: "image".to_string(),
            prompt: "sunlit loft office".to_string(),
        }
    }

    #[tokio::test]
    async fn test_hosted_by_default() {
        let generator = MockMediaGenerator::new();
        let asset = generator.generate(&request()).await.unwrap();
        assert!(matches!(asset, MediaAsset::Hosted { .. }));
        assert_eq!(generator.recorded_requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_bytes_mode() {
        let generator = MockMediaGenerator::new();
        generator.set_return_bytes(true).await;
        let asset = generator.generate(&request()).await.unwrap();
        assert!(matches!(asset, MediaAsset::Bytes { .. }));
    }

    #[tokio::test]
    async fn test_object_store_records_uploads() {
        let store = MockObjectStore::new();
        let url = store.put(vec![1, 2, 3], "image/png").await.unwrap();
        assert!(url.starts_with("https://cdn.example.com/u/"));
        assert_eq!(store.uploads().await, vec![(3, "image/png".to_string())]);
    }
}
