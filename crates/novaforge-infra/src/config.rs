//! Configuration loader for NovaForge.
//!
//! Layers, lowest to highest precedence:
//! 1. [`ForgeConfig::default()`]
//! 2. A TOML file (`--config <path>`, or `novaforge.toml` in the working
//!    directory when present)
//! 3. Environment variables (the binary loads `.env` into the environment
//!    with `dotenvy` before calling [`load_config`])
//!
//! The provider API key is only ever read from the environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use thiserror::Error;

use novaforge_types::config::ForgeConfig;
use novaforge_types::llm::ProviderType;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "novaforge.toml";

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BUILD_HOOK: &str = "NETLIFY_BUILD_HOOK";
pub const ENV_SITE_URL: &str = "NETLIFY_SITE_URL";
pub const ENV_GENERATED_ROOT: &str = "NOVAFORGE_GENERATED_ROOT";
pub const ENV_DEPLOY_TARGET: &str = "NOVAFORGE_DEPLOY_TARGET";
pub const ENV_MODEL: &str = "NOVAFORGE_MODEL";
pub const ENV_PROVIDER: &str = "NOVAFORGE_PROVIDER";
pub const ENV_BASE_URL: &str = "NOVAFORGE_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {message}")]
    InvalidEnv { var: &'static str, message: String },

    #[error("{0} is not set; export it or add it to .env")]
    MissingApiKey(&'static str),
}

/// Fully resolved configuration plus the provider credential.
pub struct LoadedConfig {
    pub config: ForgeConfig,
    pub api_key: SecretString,
}

/// Load configuration from file and process environment.
pub async fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    load_config_with(path, |var| std::env::var(var).ok()).await
}

/// Same as [`load_config`] with an explicit environment lookup.
pub async fn load_config_with<E>(path: Option<&Path>, env: E) -> Result<LoadedConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let mut config = read_config_file(path).await?;
    apply_env_overrides(&mut config, &env)?;

    let key_var = api_key_var(&config.llm.provider);
    let api_key = env(key_var)
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from)
        .ok_or(ConfigError::MissingApiKey(key_var))?;

    Ok(LoadedConfig { config, api_key })
}

/// Environment variable holding the credential for `provider`.
pub fn api_key_var(provider: &ProviderType) -> &'static str {
    match provider {
        ProviderType::Gemini => ENV_GEMINI_API_KEY,
        ProviderType::OpenAiCompatible => ENV_OPENAI_API_KEY,
    }
}

async fn read_config_file(path: Option<&Path>) -> Result<ForgeConfig, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!("no {} found, using defaults", path.display());
            return Ok(ForgeConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    tracing::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

fn apply_env_overrides<E>(config: &mut ForgeConfig, env: &E) -> Result<(), ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let get = |var: &str| env(var).filter(|v| !v.trim().is_empty());

    if let Some(root) = get(ENV_GENERATED_ROOT) {
        config.generated_root = PathBuf::from(root);
    }
    if let Some(target) = get(ENV_DEPLOY_TARGET) {
        config.deploy_target = PathBuf::from(target);
    }
    if let Some(provider) = get(ENV_PROVIDER) {
        config.llm.provider = provider
            .parse()
            .map_err(|message| ConfigError::InvalidEnv {
                var: ENV_PROVIDER,
                message,
            })?;
    }
    if let Some(model) = get(ENV_MODEL) {
        config.llm.model = model;
    }
    if let Some(base_url) = get(ENV_BASE_URL) {
        config.llm.base_url = Some(base_url);
    }
    if let Some(hook) = get(ENV_BUILD_HOOK) {
        config.deploy.build_hook_url = Some(hook);
    }
    if let Some(site) = get(ENV_SITE_URL) {
        config.deploy.site_url = Some(site);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[tokio::test]
    async fn missing_api_key_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("novaforge.toml");
        tokio::fs::write(&path, "").await.unwrap();

        let err = load_config_with(Some(&path), env_of(&[])).await.err().unwrap();
        assert!(matches!(err, ConfigError::MissingApiKey("GEMINI_API_KEY")));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn file_values_then_env_overrides() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("forge.toml");
        tokio::fs::write(
            &path,
            r#"
generated_root = "from_file"
deploy_target = "stage_from_file"

[llm]
model = "gemini-2.0-flash"
"#,
        )
        .await
        .unwrap();

        let loaded = load_config_with(
            Some(&path),
            env_of(&[
                ("GEMINI_API_KEY", "secret"),
                ("NOVAFORGE_GENERATED_ROOT", "from_env"),
                ("NETLIFY_SITE_URL", "https://site.example.com"),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(loaded.api_key.expose_secret(), "secret");
        assert_eq!(loaded.config.generated_root, PathBuf::from("from_env"));
        assert_eq!(loaded.config.deploy_target, PathBuf::from("stage_from_file"));
        assert_eq!(loaded.config.llm.model, "gemini-2.0-flash");
        assert_eq!(
            loaded.config.deploy.site_url.as_deref(),
            Some("https://site.example.com")
        );
        assert!(loaded.config.deploy.build_hook_url.is_none());
    }

    #[tokio::test]
    async fn openai_provider_uses_openai_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("forge.toml");
        tokio::fs::write(&path, "").await.unwrap();

        let loaded = load_config_with(
            Some(&path),
            env_of(&[("NOVAFORGE_PROVIDER", "openai"), ("OPENAI_API_KEY", "sk-test")]),
        )
        .await
        .unwrap();
        assert_eq!(loaded.config.llm.provider, ProviderType::OpenAiCompatible);
        assert_eq!(loaded.api_key.expose_secret(), "sk-test");
    }

    #[tokio::test]
    async fn invalid_provider_env_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("forge.toml");
        tokio::fs::write(&path, "").await.unwrap();

        let err = load_config_with(
            Some(&path),
            env_of(&[("NOVAFORGE_PROVIDER", "carrier-pigeon"), ("GEMINI_API_KEY", "k")]),
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "NOVAFORGE_PROVIDER", .. }));
    }

    #[tokio::test]
    async fn explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_with(Some(&tmp.path().join("nope.toml")), env_of(&[]))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("forge.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!").await.unwrap();

        let err = load_config_with(Some(&path), env_of(&[("GEMINI_API_KEY", "k")]))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = ForgeConfig::default();
        apply_env_overrides(&mut config, &env_of(&[("NOVAFORGE_MODEL", "  ")])).unwrap();
        assert_eq!(config.llm.model, "gemini-2.5-flash");
    }
}
