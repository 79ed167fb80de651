//! HTTP/REST API layer for NovaForge.
//!
//! Axum-based JSON API at `/api/` plus static serving of generated projects.

pub mod error;
pub mod handlers;
pub mod router;
