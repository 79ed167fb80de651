//! Application error type mapping to HTTP status codes and the
//! `{success: false, error}` body every endpoint returns on failure.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use novaforge_types::error::{DeployError, ProjectError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Project read/write errors.
    Project(ProjectError),
    /// Deploy staging errors.
    Deploy(DeployError),
    /// Malformed request body or parameters.
    Validation(String),
}

impl From<ProjectError> for AppError {
    fn from(e: ProjectError) -> Self {
        AppError::Project(e)
    }
}

impl From<DeployError> for AppError {
    fn from(e: DeployError) -> Self {
        AppError::Deploy(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Project(ProjectError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Project not found".to_string())
            }
            AppError::Project(e @ (ProjectError::InvalidName(_) | ProjectError::InvalidRequest(_))) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Project(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Deploy(e @ (DeployError::ProjectNotFound(_) | DeployError::InvalidName(_))) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Deploy(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "request failed");
        }

        let body = json!({
            "success": false,
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
