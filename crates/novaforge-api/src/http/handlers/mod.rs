//! REST API endpoint handlers.

pub mod deploy;
pub mod health;
pub mod project;
