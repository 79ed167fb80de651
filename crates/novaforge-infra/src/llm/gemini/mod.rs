//! Native Google Gemini provider.
//!
//! Talks to the `generateContent` REST endpoint directly so JSON-schema
//! constrained output (`responseJsonSchema`) is available.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
