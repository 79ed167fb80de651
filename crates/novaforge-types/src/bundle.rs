//! The four-artifact project bundle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four files that make up a project bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Artifact {
    Html,
    Css,
    Js,
    Backend,
}

impl Artifact {
    /// All artifacts in write order.
    pub const ALL: [Artifact; 4] = [Artifact::Html, Artifact::Css, Artifact::Js, Artifact::Backend];

    /// Key used in the wire `code` object.
    pub fn key(&self) -> &'static str {
        match self {
            Artifact::Html => "html",
            Artifact::Css => "css",
            Artifact::Js => "js",
            Artifact::Backend => "backend",
        }
    }

    /// File name inside the project directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::Html => "index.html",
            Artifact::Css => "style.css",
            Artifact::Js => "app.js",
            Artifact::Backend => "backend.py",
        }
    }

    /// Sentinel marker pair used when the model answers in free text.
    pub fn markers(&self) -> (&'static str, &'static str) {
        match self {
            Artifact::Html => ("HTML_START", "HTML_END"),
            Artifact::Css => ("CSS_START", "CSS_END"),
            Artifact::Js => ("JS_START", "JS_END"),
            Artifact::Backend => ("BACKEND_START", "BACKEND_END"),
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Artifact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Artifact::Html),
            "css" => Ok(Artifact::Css),
            "js" => Ok(Artifact::Js),
            "backend" => Ok(Artifact::Backend),
            other => Err(format!("invalid artifact: '{other}'")),
        }
    }
}

/// Contents of a project's four artifacts.
///
/// Serializes to the `code` object of the HTTP API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub html: String,
    pub css: String,
    pub js: String,
    pub backend: String,
}

impl Bundle {
    pub fn get(&self, artifact: Artifact) -> &str {
        match artifact {
            Artifact::Html => &self.html,
            Artifact::Css => &self.css,
            Artifact::Js => &self.js,
            Artifact::Backend => &self.backend,
        }
    }

    pub fn set(&mut self, artifact: Artifact, content: String) {
        match artifact {
            Artifact::Html => self.html = content,
            Artifact::Css => self.css = content,
            Artifact::Js => self.js = content,
            Artifact::Backend => self.backend = content,
        }
    }
}
