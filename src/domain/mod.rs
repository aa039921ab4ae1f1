//! Domain layer - pure build logic
//!
//! This module contains the build matrix and registry rules with no external I/O.
//! Types and functions here can be unit tested without mocking.

pub mod build;
pub mod matrix;
pub mod registry;

// Re-export commonly used types
pub use build::{BuildAttempt, BuildStep, Image};
pub use matrix::expand_tags;
pub use registry::{registry_prefix, RegistryCredentials};
