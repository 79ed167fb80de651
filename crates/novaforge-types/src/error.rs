use thiserror::Error;

/// Errors related to project bundle operations.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("invalid project name: {0}")]
    InvalidName(String),

    #[error("project '{0}' not found")]
    NotFound(String),

    #[error("project '{project}' is incomplete: missing {file}")]
    IncompleteBundle { project: String, file: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("filesystem error: {0}")]
    FileSystemError(String),
}

/// Errors related to staging a project for deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Project folder not found for '{0}'. Generate code first.")]
    ProjectNotFound(String),

    #[error("invalid project name: {0}")]
    InvalidName(String),

    #[error("filesystem error: {0}")]
    FileSystemError(String),
}

impl From<ProjectError> for DeployError {
    fn from(e: ProjectError) -> Self {
        match e {
            ProjectError::InvalidName(msg) => DeployError::InvalidName(msg),
            ProjectError::NotFound(name) => DeployError::ProjectNotFound(name),
            other => DeployError::FileSystemError(other.to_string()),
        }
    }
}
