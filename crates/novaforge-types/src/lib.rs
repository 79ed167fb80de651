//! Shared domain types for NovaForge.
//!
//! Project names, the four-artifact bundle, LLM request/response shapes,
//! configuration, and the error enums used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod bundle;
pub mod config;
pub mod error;
pub mod llm;
pub mod project;
