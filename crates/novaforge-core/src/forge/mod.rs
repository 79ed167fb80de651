//! The generation pipeline: prompts in, artifacts out.

pub mod engine;
pub mod extract;
pub mod fallback;
pub mod prompt;
pub mod schema;
