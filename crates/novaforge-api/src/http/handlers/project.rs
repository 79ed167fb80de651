//! Project handlers: generate, add-feature, list, fetch.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use novaforge_core::service::project::DEFAULT_PROJECT_TYPE;
use novaforge_types::bundle::Artifact;
use novaforge_types::project::{AddFeatureRequest, DEFAULT_PROJECT_NAME, GenerateRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/generate -- Create (or replace) a project from a description.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = payload?;

    let name = body.project_name.as_deref().unwrap_or(DEFAULT_PROJECT_NAME);
    let description = body.description.as_deref().unwrap_or("");
    let project_type = body.project_type.as_deref().unwrap_or(DEFAULT_PROJECT_TYPE);

    let outcome = state
        .project_service
        .generate(name, description, project_type)
        .await?;

    Ok(Json(json!({
        "success": true,
        "code": outcome.bundle,
        "projectName": outcome.project,
        "fallback": outcome.fallback,
    })))
}

/// POST /api/add-feature -- Extend an existing project.
pub async fn add_feature(
    State(state): State<AppState>,
    payload: Result<Json<AddFeatureRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = payload?;

    let outcome = state
        .project_service
        .add_feature(
            body.project_name.as_deref(),
            body.feature_description.as_deref(),
        )
        .await?;

    let updated: Vec<&str> = outcome.updated.iter().map(Artifact::key).collect();
    Ok(Json(json!({
        "success": true,
        "code": outcome.bundle,
        "projectName": outcome.project,
        "updated": updated,
        "aiFailed": outcome.ai_failed,
    })))
}

/// GET /api/projects -- Names of every generated project.
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let projects = state.project_service.list().await?;
    Ok(Json(json!({
        "success": true,
        "projects": projects,
    })))
}

/// GET /api/projects/{name} -- A project's four artifacts.
pub async fn get_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (project, bundle) = state.project_service.get(&name).await?;
    Ok(Json(json!({
        "success": true,
        "code": bundle,
        "projectName": project,
    })))
}
