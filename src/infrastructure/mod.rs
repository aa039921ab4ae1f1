//! Infrastructure layer - external I/O adapters
//!
//! This module contains all code that interacts with external systems:
//! - Process execution (tokio::process)
//! - Container engine CLI (docker compose, login, buildx)

pub mod docker;
pub mod process;

// Re-export commonly used types
pub use docker::{BuildTarget, ContainerEngine};
pub use process::{Invocation, ProcessRunner, SystemRunner};
