/// LLM adapters.
///
/// `ChatProvider` is the narrow one-shot interface used by the response
/// enhancer and the simulation fallback; `LlmProvider` (in `agent`) is the
/// tool-calling interface used by the agent loop. Implement either trait to
/// add support for other models.

use crate::error::Result;

/// One-shot completion: system instruction plus user message in, text out
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

pub mod openai;

pub use openai::OpenAiAdapter;
