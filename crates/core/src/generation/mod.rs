//! Draft generation: LLM client, prompts, and the per-item runner.

mod draft;
mod llm;
mod prompt;
mod runner;
mod types;

pub use draft::{DraftGenerator, LlmDraftGenerator};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage, OpenAiClient};
pub use prompt::{build_instructions, user_prompt};
pub use runner::GenerationRunner;
pub use types::{
    DraftRequest, GeneratedDraft, GenerationError, GenerationMode, GenerationReport,
    GenerationRequest, GeneratorError,
};
