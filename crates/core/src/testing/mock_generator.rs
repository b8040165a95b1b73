//! Mock draft generator for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::generation::{
    DraftGenerator, DraftRequest, GeneratedDraft, GeneratorError, LlmError,
};

/// Mock implementation of the [`DraftGenerator`] trait.
///
/// Provides controllable behavior for testing:
/// - Return a configurable draft
/// - Fail for specific topics, or fail the next call outright
/// - Record every request for assertions
pub struct MockDraftGenerator {
    draft: Arc<RwLock<GeneratedDraft>>,
    requests: Arc<RwLock<Vec<DraftRequest>>>,
    next_error: Arc<RwLock<Option<String>>>,
    fail_for_topics: Arc<RwLock<Vec<String>>>,
}

impl Default for MockDraftGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDraftGenerator {
    pub fn new() -> Self {
        Self {
            draft: Arc::new(RwLock::new(GeneratedDraft {
                body_text: "Mock caption with a hook and a CTA.".to_string(),
                hashtags: Some("#mock #testing".to_string()),
                media_prompt: None,
            })),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            fail_for_topics: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the draft returned for subsequent calls.
    pub async fn set_draft(&self, draft: GeneratedDraft) {
        *self.draft.write().await = draft;
    }

    /// Configure the next call to fail with the given message.
    pub async fn set_next_error(&self, message: &str) {
        *self.next_error.write().await = Some(message.to_string());
    }

    /// Fail every call whose topic text contains the given fragment.
    pub async fn fail_for_topic(&self, fragment: &str) {
        self.fail_for_topics.write().await.push(fragment.to_string());
    }

    /// Requests recorded so far.
    pub async fn recorded_requests(&self) -> Vec<DraftRequest> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl DraftGenerator for MockDraftGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &DraftRequest) -> Result<GeneratedDraft, GeneratorError> {
        self.requests.write().await.push(request.clone());

        if let Some(message) = self.next_error.write().await.take() {
            return Err(GeneratorError::Llm(LlmError::Http(message)));
        }

        for fragment in self.fail_for_topics.read().await.iter() {
            if request.topic_text.contains(fragment) {
                return Err(GeneratorError::Llm(LlmError::Http(format!(
                    "injected failure for topic fragment: {}",
                    fragment
                ))));
            }
        }

        let mut draft = self.draft.read().await.clone();
        // Media items get a prompt by default so the caption block logic is
        // exercised without per-test setup.
        if request.content_type.is_media() && draft.media_prompt.is_none() {
            draft.media_prompt = Some("mock media prompt".to_string());
        }

        Ok(draft)
    }
}
