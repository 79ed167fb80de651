//! LLM provider implementations.
//!
//! Concrete implementations of the [`LlmProvider`] trait defined in
//! `novaforge-core`, plus a factory ([`create_provider`]) that picks one from
//! [`LlmSettings`].
//!
//! [`LlmProvider`]: novaforge_core::llm::provider::LlmProvider

pub mod gemini;
pub mod openai_compat;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use novaforge_core::llm::box_provider::BoxLlmProvider;
use novaforge_types::config::LlmSettings;
use novaforge_types::llm::{LlmError, ProviderType};

use self::gemini::GeminiProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{custom, openai_defaults};

/// Create a [`BoxLlmProvider`] from [`LlmSettings`].
///
/// `base_url` overrides the provider's default endpoint. For the
/// OpenAI-compatible type, a base URL pointing anywhere other than OpenAI
/// yields a generic configuration.
pub fn create_provider(
    settings: &LlmSettings,
    api_key: &SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    let timeout = Duration::from_secs(settings.request_timeout_secs);

    let provider = match settings.provider {
        ProviderType::Gemini => {
            let key = SecretString::from(api_key.expose_secret().to_string());
            let mut provider = GeminiProvider::new(key, &settings.model, timeout)?;
            if let Some(base_url) = settings.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            BoxLlmProvider::new(provider)
        }
        ProviderType::OpenAiCompatible => {
            let key = api_key.expose_secret();
            let config = match settings.base_url.as_deref() {
                Some(base_url) => custom(base_url, key, &settings.model),
                None => openai_defaults(key, &settings.model),
            };
            BoxLlmProvider::new(OpenAiCompatibleProvider::new(config, timeout))
        }
    };

    info!(
        provider = provider.name(),
        model = %settings.model,
        structured_output = provider.capabilities().structured_output,
        "LLM provider ready"
    );
    Ok(provider)
}
