//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends requests to `v1beta/models/{model}:generateContent` with the
//! `x-goog-api-key` header. Non-streaming only.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use novaforge_core::llm::provider::LlmProvider;
use novaforge_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, ProviderCapabilities,
    StopReason, Usage,
};

use super::types::{
    GeminiContent, GeminiErrorBody, GeminiPart, GeminiRequest, GeminiResponse, GenerationConfig,
};

/// Default endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini LLM provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// `model` may be given bare (`gemini-2.5-flash`) or with the
    /// `models/` resource prefix.
    pub fn new(api_key: SecretString, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        let model = model.trim_start_matches("models/").to_string();
        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            capabilities: Self::capabilities_for_model(&model),
            model,
        })
    }

    /// Override the base URL (proxies, regional endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn capabilities_for_model(model: &str) -> ProviderCapabilities {
        let max_output_tokens = if model.contains("2.5") { 65_536 } else { 8_192 };
        ProviderCapabilities {
            structured_output: true,
            max_context_tokens: 1_000_000,
            max_output_tokens,
        }
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Convert a generic [`CompletionRequest`] into a [`GeminiRequest`].
    fn to_gemini_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let text_content = |role: Option<&str>, text: &str| GeminiContent {
            role: role.map(str::to_string),
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
            }],
        };

        // Gemini has no system role inside `contents`; fold system messages
        // into the system instruction.
        let mut system_parts: Vec<&str> = request.system.as_deref().into_iter().collect();
        let mut contents = Vec::with_capacity(request.messages.len());
        for msg in &request.messages {
            match msg.role {
                MessageRole::System => system_parts.push(&msg.content),
                MessageRole::User => contents.push(text_content(Some("user"), &msg.content)),
                MessageRole::Assistant => contents.push(text_content(Some("model"), &msg.content)),
            }
        }
        let system_instruction =
            (!system_parts.is_empty()).then(|| text_content(None, &system_parts.join("\n\n")));

        let (response_mime_type, response_json_schema) = match &request.output_config {
            Some(config) => {
                let mut schema = config.format.json_schema.schema.clone();
                if let Some(obj) = schema.as_object_mut() {
                    obj.remove("$schema");
                }
                (Some("application/json".to_string()), Some(schema))
            }
            None => (None, None),
        };

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
                stop_sequences: request.stop_sequences.clone().filter(|s| !s.is_empty()),
                response_mime_type,
                response_json_schema,
            },
        }
    }
}

// GeminiProvider does NOT derive Debug; the client and key stay out of logs.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.trim_start_matches("models/")
        };
        let body = self.to_gemini_request(request);

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000);
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &error_body, retry_after_ms));
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        if gemini_resp.candidates.is_empty() {
            let reason = gemini_resp
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(LlmError::EmptyResponse(reason));
        }

        let usage = gemini_resp
            .usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: gemini_resp.response_id.clone().unwrap_or_default(),
            content: gemini_resp.text(),
            model: gemini_resp
                .model_version
                .clone()
                .unwrap_or_else(|| model.to_string()),
            stop_reason: map_finish_reason(gemini_resp.finish_reason()),
            usage,
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Provider {
            message: format!("HTTP request failed: {e}"),
        }
    }
}

/// Map a non-2xx response to an [`LlmError`].
fn map_status_error(status: StatusCode, body: &str, retry_after_ms: Option<u64>) -> LlmError {
    let message = serde_json::from_str::<GeminiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        400 => LlmError::InvalidRequest(message),
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited { retry_after_ms },
        503 => LlmError::Overloaded(message),
        504 => LlmError::Timeout,
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

fn map_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            StopReason::ContentFilter
        }
        _ => StopReason::EndTurn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novaforge_types::llm::{Message, OutputConfig};

    fn provider() -> GeminiProvider {
        GeminiProvider::new(
            SecretString::from("test-key"),
            "models/gemini-2.5-flash",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gemini-2.5-flash".to_string(),
            messages: vec![Message::user("build a todo app")],
            system: Some("be terse".to_string()),
            max_tokens: 2048,
            temperature: Some(0.2),
            stop_sequences: None,
            output_config: None,
        }
    }

    #[test]
    fn test_model_prefix_is_stripped() {
        let p = provider();
        assert_eq!(p.model(), "gemini-2.5-flash");
        assert_eq!(
            p.url(p.model()),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(p.capabilities().structured_output);
    }

    #[test]
    fn test_base_url_override() {
        let p = provider().with_base_url("http://localhost:8080/");
        assert_eq!(
            p.url("m"),
            "http://localhost:8080/v1beta/models/m:generateContent"
        );
    }

    #[test]
    fn test_request_serialization() {
        let body = provider().to_gemini_request(&request());
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "build a todo app");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be terse");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(json["generationConfig"]["temperature"], 0.2);
        assert!(json["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_structured_request_attaches_schema() {
        let mut req = request();
        req.output_config = Some(OutputConfig::json_schema(
            "Page",
            serde_json::json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "type": "object",
                "properties": {"html": {"type": "string"}},
                "required": ["html"],
                "additionalProperties": false
            }),
        ));

        let json = serde_json::to_value(provider().to_gemini_request(&req)).unwrap();
        let config = &json["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseJsonSchema"]["type"], "object");
        assert!(config["responseJsonSchema"].get("$schema").is_none());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let resp: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "<html>"}, {"text": "</html>"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 34},
                "modelVersion": "gemini-2.5-flash",
                "responseId": "abc"
            }"#,
        )
        .unwrap();
        assert_eq!(resp.text(), "<html></html>");
        assert_eq!(map_finish_reason(resp.finish_reason()), StopReason::EndTurn);
        assert_eq!(resp.usage_metadata.unwrap().candidates_token_count, 34);
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            map_status_error(StatusCode::BAD_REQUEST, body, None),
            LlmError::InvalidRequest(m) if m == "API key not valid"
        ));
        assert!(matches!(
            map_status_error(StatusCode::FORBIDDEN, "", None),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            map_status_error(StatusCode::TOO_MANY_REQUESTS, "", Some(2000)),
            LlmError::RateLimited { retry_after_ms: Some(2000) }
        ));
        assert!(matches!(
            map_status_error(StatusCode::SERVICE_UNAVAILABLE, "busy", None),
            LlmError::Overloaded(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom", None),
            LlmError::Provider { .. }
        ));
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(map_finish_reason(Some("MAX_TOKENS")), StopReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("SAFETY")), StopReason::ContentFilter);
        assert_eq!(map_finish_reason(None), StopReason::EndTurn);
    }
}
