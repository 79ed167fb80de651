//! Business logic services (use cases).
//!
//! Services orchestrate the forge engine and filesystem operations. They
//! depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod deploy;
pub mod fs;
mod locks;
pub mod project;
