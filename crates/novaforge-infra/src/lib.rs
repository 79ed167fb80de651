//! Infrastructure layer for NovaForge.
//!
//! Implementations of the ports defined in `novaforge-core` (LLM providers,
//! local filesystem) plus configuration loading and the deploy build hook.

pub mod config;
pub mod filesystem;
pub mod hooks;
pub mod llm;
