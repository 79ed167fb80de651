//! Business logic and port trait definitions for NovaForge.
//!
//! This crate defines the "ports" (`LlmProvider`, `FileSystem`) that the
//! infrastructure layer implements, plus the forge pipeline (prompt
//! construction, response extraction, fallbacks) and the project/deploy
//! services. It depends only on `novaforge-types` -- never on
//! `novaforge-infra` or any network/IO crate.

pub mod forge;
pub mod llm;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
