//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the REST API. Services are generic over the filesystem port; AppState
//! pins them to [`LocalFileSystem`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use novaforge_core::forge::engine::{ForgeEngine, GenerationSettings};
use novaforge_core::llm::box_provider::BoxLlmProvider;
use novaforge_core::service::deploy::DeployService;
use novaforge_core::service::project::ProjectService;
use novaforge_infra::config::load_config;
use novaforge_infra::filesystem::LocalFileSystem;
use novaforge_infra::llm::create_provider;
use novaforge_types::config::ForgeConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteProjectService = ProjectService<LocalFileSystem>;

pub type ConcreteDeployService = DeployService<LocalFileSystem>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub project_service: Arc<ConcreteProjectService>,
    pub deploy_service: Arc<ConcreteDeployService>,
    pub config: Arc<ForgeConfig>,
    /// Client for outbound build-hook calls.
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Load configuration, create the LLM provider and the working directories.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let loaded = load_config(config_path).await?;
        let provider = create_provider(&loaded.config.llm, &loaded.api_key)?;

        tokio::fs::create_dir_all(&loaded.config.generated_root).await?;
        tokio::fs::create_dir_all(&loaded.config.deploy_target).await?;

        tracing::info!(
            generated_root = %loaded.config.generated_root.display(),
            deploy_target = %loaded.config.deploy_target.display(),
            "NovaForge state initialized"
        );

        Ok(Self::from_parts(loaded.config, provider))
    }

    /// Wire services from an already resolved config and provider.
    pub fn from_parts(config: ForgeConfig, provider: BoxLlmProvider) -> Self {
        let engine = ForgeEngine::new(
            provider,
            GenerationSettings {
                model: config.llm.model.clone(),
                max_tokens: config.llm.max_tokens,
                temperature: config.llm.temperature,
            },
        );

        let project_service = ProjectService::new(
            engine,
            LocalFileSystem,
            config.generated_root.clone(),
        );
        let deploy_service = DeployService::new(
            LocalFileSystem,
            config.generated_root.clone(),
            config.deploy_target.clone(),
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        Self {
            project_service: Arc::new(project_service),
            deploy_service: Arc::new(deploy_service),
            config: Arc::new(config),
            http_client,
        }
    }
}
