//! Deploy staging: mirror one project bundle into a staging directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use novaforge_types::error::DeployError;
use novaforge_types::project::ProjectName;

use crate::service::fs::FileSystem;
use crate::service::locks::KeyedLocks;

/// Result of a successful deploy.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub project: ProjectName,
    pub destination: PathBuf,
}

/// Copies bundles from the project root into a staging directory.
///
/// Each destination holds exactly one bundle at a time; deploys to the same
/// destination are serialized for the whole clear+copy.
pub struct DeployService<F: FileSystem> {
    fs: F,
    projects_root: PathBuf,
    staging: PathBuf,
    locks: KeyedLocks<PathBuf>,
}

impl<F: FileSystem> DeployService<F> {
    pub fn new(fs: F, projects_root: impl Into<PathBuf>, staging: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            projects_root: projects_root.into(),
            staging: staging.into(),
            locks: KeyedLocks::default(),
        }
    }

    /// Stage a project into the configured staging directory.
    pub async fn deploy(&self, raw_name: &str) -> Result<DeployOutcome, DeployError> {
        let staging = self.staging.clone();
        self.deploy_to(raw_name, &staging).await
    }

    /// Stage a project into `destination`, replacing whatever it held.
    pub async fn deploy_to(
        &self,
        raw_name: &str,
        destination: &Path,
    ) -> Result<DeployOutcome, DeployError> {
        let (project, source) = self.resolve(raw_name).await?;

        let _guard = self.locks.lock(&destination.to_path_buf()).await;

        self.fs
            .create_dir_all(destination)
            .await
            .map_err(|e| DeployError::FileSystemError(e.to_string()))?;
        self.fs
            .clear_dir(destination)
            .await
            .map_err(|e| DeployError::FileSystemError(e.to_string()))?;
        self.fs
            .copy_dir_contents(&source, destination)
            .await
            .map_err(|e| DeployError::FileSystemError(e.to_string()))?;

        info!(project = %project, destination = %destination.display(), "project staged");
        Ok(DeployOutcome {
            project,
            destination: destination.to_path_buf(),
        })
    }

    /// Canonical directory first, then the directory the older `-`
    /// substituting scheme would have used.
    async fn resolve(&self, raw_name: &str) -> Result<(ProjectName, PathBuf), DeployError> {
        let canonical = ProjectName::sanitize(raw_name).ok();

        if let Some(name) = &canonical {
            let dir = self.projects_root.join(name.as_str());
            if self.fs.is_dir(&dir).await {
                return Ok((name.clone(), dir));
            }
        }

        if let Some(alias) = ProjectName::legacy_deploy_alias(raw_name) {
            if Some(&alias) != canonical.as_ref() {
                let dir = self.projects_root.join(alias.as_str());
                if self.fs.is_dir(&dir).await {
                    debug!(project = %alias, "resolved through legacy deploy name");
                    return Ok((alias, dir));
                }
            }
        }

        let shown = canonical
            .map(ProjectName::into_inner)
            .unwrap_or_else(|| raw_name.trim().to_string());
        Err(DeployError::ProjectNotFound(shown))
    }
}
