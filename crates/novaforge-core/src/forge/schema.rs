//! Structured output shapes requested from schema-capable providers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use novaforge_types::bundle::{Artifact, Bundle};
use novaforge_types::llm::{LlmError, OutputConfig, add_additional_properties_false};

/// Response shape for creating a new project page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedPage {
    /// Complete HTML document with inline <style> and <script> blocks.
    pub html: String,
}

/// Response shape for extending an existing bundle.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BundleRevision {
    /// Complete updated index.html.
    pub html: String,
    /// Complete updated style.css.
    pub css: String,
    /// Complete updated app.js.
    pub js: String,
    /// Complete updated backend.py.
    pub backend: String,
}

impl BundleRevision {
    pub fn into_bundle(self) -> Bundle {
        Bundle {
            html: self.html,
            css: self.css,
            js: self.js,
            backend: self.backend,
        }
    }
}

/// Build a strict JSON-schema [`OutputConfig`] for `T`.
pub fn output_config_for<T: JsonSchema>(name: &str) -> Result<OutputConfig, LlmError> {
    let schema = schemars::schema_for!(T);
    let mut value = serde_json::to_value(schema)
        .map_err(|e| LlmError::InvalidRequest(format!("{name} schema serialization failed: {e}")))?;
    add_additional_properties_false(&mut value);
    Ok(OutputConfig::json_schema(name, value))
}

/// Artifacts that a revision leaves blank are treated as "not returned".
pub fn non_empty_fields(revision: BundleRevision) -> Vec<(Artifact, String)> {
    let bundle = revision.into_bundle();
    Artifact::ALL
        .into_iter()
        .filter_map(|artifact| {
            let content = bundle.get(artifact).trim();
            (!content.is_empty()).then(|| (artifact, content.to_string()))
        })
        .collect()
}
