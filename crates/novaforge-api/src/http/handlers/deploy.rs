//! Deploy handler: stage a project and ping the build hook.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};

use novaforge_infra::hooks::trigger_build_hook;
use novaforge_types::project::{DEFAULT_DEPLOY_NAME, DeployRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/deploy -- Copy a project into the staging directory.
///
/// When a build hook is configured it is fired in the background; its
/// outcome never changes the response.
pub async fn deploy(
    State(state): State<AppState>,
    payload: Result<Json<DeployRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = payload?;
    let name = body
        .project_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_DEPLOY_NAME);

    let outcome = state.deploy_service.deploy(name).await?;

    if let Some(url) = state.config.deploy.build_hook_url.clone() {
        let client = state.http_client.clone();
        tokio::spawn(async move {
            trigger_build_hook(&client, &url).await;
        });
    }

    let staging_name = outcome
        .destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| outcome.destination.display().to_string());

    let mut response = json!({
        "success": true,
        "message": format!("Project '{}' copied to {staging_name}.", outcome.project),
    });
    if let Some(site_url) = &state.config.deploy.site_url {
        response["siteUrl"] = json!(site_url);
    }

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::project::generate;
    use crate::state::test_support::{MockProvider, PAGE, state_in};
    use novaforge_types::project::GenerateRequest;

    fn deploy_body(name: &str) -> Result<Json<DeployRequest>, JsonRejection> {
        Ok(Json(DeployRequest {
            project_name: Some(name.to_string()),
        }))
    }

    async fn seed(state: &AppState, name: &str) {
        let body = GenerateRequest {
            project_name: Some(name.to_string()),
            description: Some("site".to_string()),
            project_type: None,
        };
        generate(State(state.clone()), Ok(Json(body))).await.unwrap();
    }

    #[tokio::test]
    async fn test_deploy_stages_project() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), MockProvider::replying(PAGE));
        seed(&state, "Shop").await;

        let Json(resp) = deploy(State(state.clone()), deploy_body("Shop")).await.unwrap();
        assert_eq!(resp["success"], true);
        assert_eq!(resp["message"], "Project 'Shop' copied to deploy_target.");
        assert!(resp.get("siteUrl").is_none());

        let staged = dir.path().join("deploy_target").join("index.html");
        assert!(staged.exists());
    }

    #[tokio::test]
    async fn test_deploy_blank_name_uses_default_project() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), MockProvider::replying(PAGE));
        seed(&state, DEFAULT_DEPLOY_NAME).await;

        for name in ["", "   "] {
            let Json(resp) = deploy(State(state.clone()), deploy_body(name)).await.unwrap();
            assert_eq!(resp["message"], "Project 'website' copied to deploy_target.");
        }
        let Json(resp) = deploy(State(state), Ok(Json(DeployRequest::default())))
            .await
            .unwrap();
        assert_eq!(resp["success"], true);
    }

    #[tokio::test]
    async fn test_deploy_replaces_previous_project() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), MockProvider::replying(PAGE));
        seed(&state, "First").await;
        seed(&state, "Second").await;

        let staging = dir.path().join("deploy_target");
        std::fs::create_dir_all(&staging).unwrap();
        std::fs::write(staging.join("stale.txt"), "old").unwrap();

        deploy(State(state.clone()), deploy_body("First")).await.unwrap();
        deploy(State(state), deploy_body("Second")).await.unwrap();

        assert!(!staging.join("stale.txt").exists());
        let backend = std::fs::read_to_string(staging.join("backend.py")).unwrap();
        assert!(backend.contains("second.db"));
    }

    #[tokio::test]
    async fn test_deploy_reports_site_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path(), MockProvider::replying(PAGE));
        let mut config = (*state.config).clone();
        config.deploy.site_url = Some("https://forge.example.app".to_string());
        state.config = std::sync::Arc::new(config);
        seed(&state, "Shop").await;

        let Json(resp) = deploy(State(state), deploy_body("Shop")).await.unwrap();
        assert_eq!(resp["siteUrl"], "https://forge.example.app");
    }

    #[tokio::test]
    async fn test_deploy_missing_project_is_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), MockProvider::replying(PAGE));

        let err = deploy(State(state), deploy_body("Ghost")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Deploy(novaforge_types::error::DeployError::ProjectNotFound(_))
        ));
    }
}
