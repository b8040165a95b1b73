//! Draft generator trait and the LLM-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;

use super::llm::{CompletionRequest, LlmClient};
use super::prompt;
use super::types::{DraftRequest, GeneratedDraft, GeneratorError};

/// Trait for draft generators.
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    /// Generator name (for logs and reports).
    fn name(&self) -> &str;

    /// Draft one item. Any failure is a generic error the caller records on
    /// the item; nothing here mutates state.
    async fn generate(&self, request: &DraftRequest) -> Result<GeneratedDraft, GeneratorError>;
}

/// Draft generator backed by an LLM chat client.
pub struct LlmDraftGenerator {
    client: Arc<dyn LlmClient>,
}

impl LlmDraftGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DraftGenerator for LlmDraftGenerator {
    fn name(&self) -> &str {
        "llm"
    }

    async fn generate(&self, request: &DraftRequest) -> Result<GeneratedDraft, GeneratorError> {
        let system =
            prompt::build_instructions(&request.platform, &request.brand_id, request.content_type);
        let user = prompt::user_prompt(
            &request.topic_text,
            &request.brand_id,
            request.brand_context.as_deref(),
        );

        let completion = self
            .client
            .complete(
                CompletionRequest::new(user)
                    .with_system(system)
                    .with_max_tokens(1024)
                    .with_temperature(0.7),
            )
            .await?;

        parse_draft(&completion.text)
    }
}

/// Extract the JSON draft from the model output. Models sometimes wrap the
/// object in prose or fences, so locate the outermost braces first.
fn parse_draft(text: &str) -> Result<GeneratedDraft, GeneratorError> {
    let start = text.find('{');
    let end = text.rfind('}');

    let json = match (start, end) {
        (Some(s), Some(e)) if e > s => &text[s..=e],
        _ => {
            return Err(GeneratorError::Malformed(format!(
                "no JSON object in response: {}",
                text.chars().take(120).collect::<String>()
            )))
        }
    };

    let draft: GeneratedDraft =
        serde_json::from_str(json).map_err(|e| GeneratorError::Malformed(e.to_string()))?;

    if draft.body_text.trim().is_empty() {
        return Err(GeneratorError::Malformed(
            "generator returned empty body_text".to_string(),
        ));
    }

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let draft = parse_draft(
            r##"{"body_text": "Launch day!", "hashtags": "#launch #startup", "media_prompt": null}"##,
        )
        .unwrap();
        assert_eq!(draft.body_text, "Launch day!");
        assert_eq!(draft.hashtags.as_deref(), Some("#launch #startup"));
        assert!(draft.media_prompt.is_none());
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let text = "Here is your post:\n```json\n{\"body_text\": \"Hi\", \"hashtags\": \"#x\"}\n```\nEnjoy!";
        let draft = parse_draft(text).unwrap();
        assert_eq!(draft.body_text, "Hi");
    }

    #[test]
    fn test_parse_missing_json_is_malformed() {
        assert!(matches!(
            parse_draft("sorry, I cannot help with that"),
            Err(GeneratorError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_empty_body_is_malformed() {
        assert!(matches!(
            parse_draft(r#"{"body_text": "  "}"#),
            Err(GeneratorError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_media_prompt() {
        let draft = parse_draft(
            r##"{"body_text": "New office!", "hashtags": "#moving", "media_prompt": "wide shot of a sunlit loft office"}"##,
        )
        .unwrap();
        assert_eq!(
            draft.media_prompt.as_deref(),
            Some("wide shot of a sunlit loft office")
        );
    }
}
