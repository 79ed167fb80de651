//! Configuration types and per-provider defaults for OpenAI-compatible providers.

use novaforge_types::llm::ProviderCapabilities;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "openai_compatible").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g., "gpt-4o", "llama3").
    pub model: String,
    /// What this provider supports.
    pub capabilities: ProviderCapabilities,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key: api_key.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            structured_output: false,
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

/// Any other OpenAI-compatible server (local runtimes, gateways).
pub fn custom(base_url: &str, api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai_compatible".into(),
        base_url: base_url.trim_end_matches('/').into(),
        api_key: api_key.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            structured_output: false,
            max_context_tokens: 32_000,
            max_output_tokens: 8_192,
        },
    }
}
