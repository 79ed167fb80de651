//! ForgeEngine -- one model call per create/extend request.
//!
//! Picks the response style from the provider's capabilities, builds the
//! prompt, sends a single non-streaming completion inside a `gen_ai.*`
//! span, and turns the raw text into artifacts. Fallback substitution for
//! failed calls is the caller's decision; the engine only reports errors.

use tracing::{Instrument, debug, info_span};

use novaforge_types::bundle::{Artifact, Bundle};
use novaforge_types::llm::{CompletionRequest, LlmError, Message, OutputConfig, StopReason};

use crate::llm::box_provider::BoxLlmProvider;

use super::extract::{extract_marked, parse_structured, strip_code_fences};
use super::prompt::{ResponseStyle, build_create_prompt, build_extend_prompt};
use super::schema::{BundleRevision, GeneratedPage, non_empty_fields, output_config_for};

/// Model parameters applied to every request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
}

/// Replacement artifacts pulled out of an extend response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundlePatch {
    replacements: Vec<(Artifact, String)>,
}

impl BundlePatch {
    pub fn new(replacements: Vec<(Artifact, String)>) -> Self {
        Self { replacements }
    }

    pub fn get(&self, artifact: Artifact) -> Option<&str> {
        self.replacements
            .iter()
            .find(|(a, _)| *a == artifact)
            .map(|(_, content)| content.as_str())
    }

    /// Overwrite the matching artifacts of `bundle`; everything else keeps
    /// its prior value. Returns the artifacts whose content changed.
    pub fn apply(self, bundle: &mut Bundle) -> Vec<Artifact> {
        let mut changed = Vec::new();
        for (artifact, content) in self.replacements {
            if bundle.get(artifact) != content {
                bundle.set(artifact, content);
                changed.push(artifact);
            }
        }
        changed
    }
}

/// Drives the generative service for project creation and extension.
pub struct ForgeEngine {
    provider: BoxLlmProvider,
    settings: GenerationSettings,
}

impl ForgeEngine {
    pub fn new(provider: BoxLlmProvider, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Structured JSON when the provider can enforce a schema, sentinel
    /// markers otherwise.
    pub fn response_style(&self) -> ResponseStyle {
        if self.provider.capabilities().structured_output {
            ResponseStyle::Json
        } else {
            ResponseStyle::Markers
        }
    }

    /// Ask the model for a complete HTML page for a new project.
    ///
    /// Returns the document with code fences stripped. An empty document is
    /// reported as [`LlmError::EmptyResponse`], a reply cut at the token
    /// limit as [`LlmError::Truncated`], and malformed structured JSON as
    /// [`LlmError::Deserialization`].
    pub async fn create_page(
        &self,
        project_name: &str,
        description: &str,
        project_type: &str,
    ) -> Result<String, LlmError> {
        let style = self.response_style();
        let prompt = build_create_prompt(project_name, description, project_type, style);
        let output_config = match style {
            ResponseStyle::Json => Some(output_config_for::<GeneratedPage>("GeneratedPage")?),
            ResponseStyle::Markers => None,
        };

        let raw = self.complete("create_page", prompt, output_config).await?;

        let document = match style {
            ResponseStyle::Json => match parse_structured::<GeneratedPage>(&raw) {
                Some(page) => page.html,
                None => {
                    reject_broken_json(&raw, "GeneratedPage")?;
                    raw
                }
            },
            ResponseStyle::Markers => raw,
        };

        let html = strip_code_fences(&document);
        if html.is_empty() {
            return Err(LlmError::EmptyResponse("model returned no HTML".to_string()));
        }
        Ok(html)
    }

    /// Ask the model to add a feature to `current`.
    ///
    /// Artifacts the response leaves out (or blank) are absent from the
    /// returned patch.
    pub async fn revise(&self, feature: &str, current: &Bundle) -> Result<BundlePatch, LlmError> {
        let style = self.response_style();
        let prompt = build_extend_prompt(feature, current, style);
        let output_config = match style {
            ResponseStyle::Json => Some(output_config_for::<BundleRevision>("BundleRevision")?),
            ResponseStyle::Markers => None,
        };

        let raw = self.complete("revise_bundle", prompt, output_config).await?;

        if style == ResponseStyle::Json {
            if let Some(revision) = parse_structured::<BundleRevision>(&raw) {
                return Ok(BundlePatch::new(non_empty_fields(revision)));
            }
            reject_broken_json(&raw, "BundleRevision")?;
            debug!("structured revision did not parse, scanning for markers");
        }

        let replacements = Artifact::ALL
            .into_iter()
            .filter_map(|artifact| extract_marked(&raw, artifact).map(|c| (artifact, c)))
            .collect();
        Ok(BundlePatch::new(replacements))
    }

    async fn complete(
        &self,
        operation: &'static str,
        prompt: String,
        output_config: Option<OutputConfig>,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt)],
            system: None,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            stop_sequences: None,
            output_config,
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.operation.name = operation,
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.structured = request.output_config.is_some(),
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        debug!(
            response_id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            "completion received"
        );

        // Output cut at the token limit is never a complete document.
        if response.stop_reason == StopReason::MaxTokens {
            return Err(LlmError::Truncated {
                max_tokens: self.settings.max_tokens,
            });
        }
        Ok(response.content)
    }
}

/// A structured reply that looks like JSON but does not parse is an error;
/// anything else is left for the marker/fence path.
fn reject_broken_json(raw: &str, shape: &str) -> Result<(), LlmError> {
    let text = raw.trim_start();
    if text.starts_with('{') || text.starts_with("```json") {
        return Err(LlmError::Deserialization(format!(
            "{shape} response is not valid JSON"
        )));
    }
    Ok(())
}
