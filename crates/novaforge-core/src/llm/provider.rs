//! LlmProvider trait definition.
//!
//! This is the core abstraction that all generative-AI backends implement.
//! Uses RPITIT for `complete`; [`super::box_provider::BoxLlmProvider`] wraps
//! it for runtime provider selection.

use novaforge_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// Trait for LLM provider backends (Gemini, OpenAI-compatible, etc.).
///
/// Implementations live in novaforge-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// What this provider supports (structured output, limits).
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
