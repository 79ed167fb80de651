//! Project naming.
//!
//! A project is addressed on disk by its sanitized name. Every boundary where
//! a user-supplied name enters the system (HTTP routes, CLI arguments, static
//! file serving, deploy) goes through [`ProjectName::sanitize`], so the same
//! input always maps to the same directory.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ProjectError;

/// Default project name used by the generate endpoint when none is supplied.
pub const DEFAULT_PROJECT_NAME: &str = "Website";

/// Default project name used by the deploy endpoint when none is supplied.
pub const DEFAULT_DEPLOY_NAME: &str = "website";

/// A canonical project name: non-empty, alphanumerics plus `-` and `_` only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectName(String);

impl ProjectName {
    /// Canonicalize a user-supplied name by dropping every character that is
    /// not alphanumeric, `-` or `_`.
    ///
    /// Returns [`ProjectError::InvalidName`] when nothing survives.
    pub fn sanitize(raw: &str) -> Result<Self, ProjectError> {
        let cleaned: String = raw.chars().filter(|c| is_allowed(*c)).collect();
        if cleaned.is_empty() {
            return Err(ProjectError::InvalidName(format!(
                "'{raw}' must contain at least one alphanumeric character, '-' or '_'"
            )));
        }
        Ok(Self(cleaned))
    }

    /// Directory name produced by the older deploy scheme, which trimmed the
    /// input and replaced disallowed characters with `-` instead of dropping
    /// them. Only used to locate bundles written under that scheme.
    pub fn legacy_deploy_alias(raw: &str) -> Option<Self> {
        let replaced: String = raw
            .trim()
            .chars()
            .map(|c| if is_allowed(c) { c } else { '-' })
            .collect();
        if replaced.is_empty() {
            None
        } else {
            Some(Self(replaced))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ProjectName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Body of a generate request. Every field is optional on the wire; the
/// handlers apply defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub project_type: Option<String>,
}

/// Body of an add-feature request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFeatureRequest {
    pub project_name: Option<String>,
    pub feature_description: Option<String>,
}

/// Body of a deploy request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub project_name: Option<String>,
}
