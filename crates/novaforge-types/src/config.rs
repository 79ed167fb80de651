//! Global configuration types for NovaForge.
//!
//! `ForgeConfig` is the top-level `novaforge.toml` document. Every field has
//! a default, so an empty file (or no file at all) is a valid configuration.
//! Environment overrides are applied by the infra loader.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Root directory holding one subdirectory per project.
    #[serde(default = "default_generated_root")]
    pub generated_root: PathBuf,

    /// Staging directory that mirrors the last deployed project.
    #[serde(default = "default_deploy_target")]
    pub deploy_target: PathBuf,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub deploy: DeploySettings,
}

fn default_generated_root() -> PathBuf {
    PathBuf::from("generated_projects")
}

fn default_deploy_target() -> PathBuf {
    PathBuf::from("deploy_target")
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            generated_root: default_generated_root(),
            deploy_target: default_deploy_target(),
            llm: LlmSettings::default(),
            server: ServerSettings::default(),
            deploy: DeploySettings::default(),
        }
    }
}

/// Which generative service to call and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_provider")]
    pub provider: ProviderType,

    #[serde(default = "default_model")]
    pub model: String,

    /// Override the provider's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_provider() -> ProviderType {
    ProviderType::Gemini
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            max_tokens: default_max_tokens(),
            temperature: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Optional hosting integration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploySettings {
    /// URL POSTed to after a successful deploy.
    #[serde(default)]
    pub build_hook_url: Option<String>,

    /// Public URL of the hosted site, echoed in deploy responses.
    #[serde(default)]
    pub site_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forge_config_default_values() {
        let config = ForgeConfig::default();
        assert_eq!(config.generated_root, PathBuf::from("generated_projects"));
        assert_eq!(config.deploy_target, PathBuf::from("deploy_target"));
        assert_eq!(config.llm.provider, ProviderType::Gemini);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.server.port, 5000);
        assert!(config.deploy.build_hook_url.is_none());
    }

    #[test]
    fn test_forge_config_deserialize_with_defaults() {
        let config: ForgeConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.max_tokens, 8192);
        assert_eq!(config.llm.request_timeout_secs, 300);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_forge_config_deserialize_with_values() {
        let toml_str = r#"
generated_root = "/srv/forge/projects"

[llm]
provider = "openai_compatible"
model = "gpt-4o"
base_url = "https://api.openai.com/v1"
temperature = 0.4

[server]
port = 8080

[deploy]
site_url = "https://my-app.example.com"
"#;
        let config: ForgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.generated_root, PathBuf::from("/srv/forge/projects"));
        assert_eq!(config.deploy_target, PathBuf::from("deploy_target"));
        assert_eq!(config.llm.provider, ProviderType::OpenAiCompatible);
        assert_eq!(config.llm.base_url.as_deref(), Some("https://api.openai.com/v1"));
        assert_eq!(config.llm.temperature, Some(0.4));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.deploy.site_url.as_deref(), Some("https://my-app.example.com"));
    }
}
