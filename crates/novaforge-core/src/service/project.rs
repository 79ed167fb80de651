//! Project generation, extension and retrieval.
//!
//! Bundles live at `<root>/<ProjectName>/{index.html, style.css, app.js,
//! backend.py}`. Every write to a project happens under that project's
//! async mutex; reads take no lock and rely on each file being replaced
//! atomically by the [`FileSystem`] adapter.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use novaforge_types::bundle::{Artifact, Bundle};
use novaforge_types::error::ProjectError;
use novaforge_types::project::ProjectName;

use crate::forge::engine::{BundlePatch, ForgeEngine};
use crate::forge::extract::{inline_script, inline_style};
use crate::forge::fallback::{EMPTY_SHELL_HTML, backend_template, script_or_fallback};
use crate::service::fs::FileSystem;
use crate::service::locks::KeyedLocks;

/// Project type used when the caller does not name one.
pub const DEFAULT_PROJECT_TYPE: &str = "custom";

/// Result of a generate call.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub project: ProjectName,
    pub bundle: Bundle,
    /// The model call failed and the empty shell page was written instead.
    pub fallback: bool,
}

/// Result of an add-feature call.
#[derive(Debug, Clone)]
pub struct FeatureOutcome {
    pub project: ProjectName,
    pub bundle: Bundle,
    /// Artifacts whose content changed.
    pub updated: Vec<Artifact>,
    /// The model call failed and the prior bundle was kept.
    pub ai_failed: bool,
}

/// Service for creating, extending and reading generated projects.
///
/// Generic over the filesystem so tests can run against an in-memory tree.
pub struct ProjectService<F: FileSystem> {
    engine: ForgeEngine,
    fs: F,
    root: PathBuf,
    locks: KeyedLocks<ProjectName>,
}

impl<F: FileSystem> ProjectService<F> {
    pub fn new(engine: ForgeEngine, fs: F, root: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            fs,
            root: root.into(),
            locks: KeyedLocks::default(),
        }
    }

    /// Directory of a project under the storage root.
    pub fn project_dir(&self, name: &ProjectName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Generate a new bundle and write it, replacing any existing project of
    /// the same name.
    ///
    /// A failed model call is not an error: the empty shell page is written
    /// and the outcome is flagged with `fallback`.
    pub async fn generate(
        &self,
        raw_name: &str,
        description: &str,
        project_type: &str,
    ) -> Result<GenerateOutcome, ProjectError> {
        let project = ProjectName::sanitize(raw_name)?;

        let (html, fallback) = match self
            .engine
            .create_page(project.as_str(), description, project_type)
            .await
        {
            Ok(html) => (html, false),
            Err(e) => {
                warn!(project = %project, error = %e, "page generation failed, writing empty shell");
                (EMPTY_SHELL_HTML.to_string(), true)
            }
        };

        let css = inline_style(&html);
        let (js, script_fallback) = script_or_fallback(inline_script(&html));
        if script_fallback {
            debug!(project = %project, "no usable inline script, using reference script");
        }
        let bundle = Bundle {
            html,
            css,
            js,
            backend: backend_template(raw_name),
        };

        let _guard = self.locks.lock(&project).await;
        self.write_bundle(&project, &bundle).await?;

        info!(project = %project, fallback, "project generated");
        Ok(GenerateOutcome {
            project,
            bundle,
            fallback,
        })
    }

    /// Extend an existing bundle with a feature.
    ///
    /// The whole read-modify-write runs under the project lock. Artifacts the
    /// model leaves out keep their prior content; a failed model call keeps
    /// the whole bundle and sets `ai_failed`.
    pub async fn add_feature(
        &self,
        raw_name: Option<&str>,
        feature: Option<&str>,
    ) -> Result<FeatureOutcome, ProjectError> {
        let (raw_name, feature) = match (raw_name, feature.map(str::trim)) {
            (Some(name), Some(feature)) if !feature.is_empty() => (name, feature),
            _ => {
                return Err(ProjectError::InvalidRequest(
                    "projectName and featureDescription are required".to_string(),
                ));
            }
        };
        let project = ProjectName::sanitize(raw_name)?;

        let _guard = self.locks.lock(&project).await;

        let mut bundle = self.read_bundle(&project).await?;

        let (patch, ai_failed) = match self.engine.revise(feature, &bundle).await {
            Ok(patch) => (patch, false),
            Err(e) => {
                warn!(project = %project, error = %e, "feature generation failed, keeping bundle");
                (BundlePatch::default(), true)
            }
        };

        let updated = patch.apply(&mut bundle);
        self.write_bundle(&project, &bundle).await?;

        info!(
            project = %project,
            updated = ?updated.iter().map(Artifact::key).collect::<Vec<_>>(),
            ai_failed,
            "feature applied"
        );
        Ok(FeatureOutcome {
            project,
            bundle,
            updated,
            ai_failed,
        })
    }

    /// Read a project's bundle.
    pub async fn get(&self, raw_name: &str) -> Result<(ProjectName, Bundle), ProjectError> {
        let project = ProjectName::sanitize(raw_name)?;
        let bundle = self.read_bundle(&project).await?;
        Ok((project, bundle))
    }

    /// Names of all projects, sorted. Hidden directories are skipped.
    pub async fn list(&self) -> Result<Vec<String>, ProjectError> {
        if !self.fs.is_dir(&self.root).await {
            return Ok(Vec::new());
        }
        let mut names = self
            .fs
            .list_dirs(&self.root)
            .await
            .map_err(|e| ProjectError::FileSystemError(e.to_string()))?;
        names.retain(|name| !name.starts_with('.'));
        names.sort();
        Ok(names)
    }

    async fn read_bundle(&self, project: &ProjectName) -> Result<Bundle, ProjectError> {
        let dir = self.project_dir(project);
        if !self.fs.is_dir(&dir).await {
            return Err(ProjectError::NotFound(project.to_string()));
        }

        let mut bundle = Bundle::default();
        for artifact in Artifact::ALL {
            let path = dir.join(artifact.file_name());
            if !self.fs.exists(&path).await {
                return Err(ProjectError::IncompleteBundle {
                    project: project.to_string(),
                    file: artifact.file_name().to_string(),
                });
            }
            let content = self
                .fs
                .read_file(&path)
                .await
                .map_err(|e| ProjectError::FileSystemError(e.to_string()))?;
            bundle.set(artifact, content);
        }
        Ok(bundle)
    }

    async fn write_bundle(&self, project: &ProjectName, bundle: &Bundle) -> Result<(), ProjectError> {
        let dir = self.project_dir(project);
        self.fs
            .create_dir_all(&dir)
            .await
            .map_err(|e| ProjectError::FileSystemError(e.to_string()))?;

        for artifact in Artifact::ALL {
            self.fs
                .write_file(&dir.join(artifact.file_name()), bundle.get(artifact))
                .await
                .map_err(|e| ProjectError::FileSystemError(e.to_string()))?;
        }
        Ok(())
    }
}
