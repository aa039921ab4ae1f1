//! Centralized error types for containerssh-build
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.
//! Messages never repeat their source, so the `{:#}` chain reads once.

use thiserror::Error;

/// Top-level error type for a version build
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot push")]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error("Failed to write build report")]
    Report(#[from] std::io::Error),
}

/// Manifest loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Manifest file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read manifest {path}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {message}")]
    ParseError { path: String, message: String },
}

/// A credential environment variable named in the manifest is unset or empty
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("no organisation set in the {variable} environment variable")]
    MissingOrganisation { variable: String },

    #[error("no username set in the {variable} environment variable")]
    MissingUsername { variable: String },

    #[error("no password set in the {variable} environment variable")]
    MissingPassword { variable: String },
}

/// External process errors
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{program} not found in PATH")]
    NotFound {
        program: String,
        source: which::Error,
    },

    #[error("failed to start {program}")]
    StartFailed {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} {}", exit_description(.code))]
    NonZeroExit { program: String, code: Option<i32> },

    #[error("I/O error while running {program}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// Identifies one (version, registry, tag) unit of work in error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub version: String,
    pub registry: String,
    pub tag: String,
}

/// A build step failed; wraps the process error with the phase that produced it
#[derive(Error, Debug)]
pub enum StepError {
    #[error("build failed for version {} registry {} tag {}", .triple.version, .triple.registry, .triple.tag)]
    BuildFailed { triple: Triple, source: ProcessError },

    #[error("tests failed for version {} registry {} tag {}", .triple.version, .triple.registry, .triple.tag)]
    TestFailed { triple: Triple, source: ProcessError },

    #[error("cleanup failed for version {} registry {} tag {}", .triple.version, .triple.registry, .triple.tag)]
    CleanupFailed { triple: Triple, source: ProcessError },

    #[error("push failed for version {} tag {} registry {}", .triple.version, .triple.tag, .triple.registry)]
    PushFailed { triple: Triple, source: ProcessError },
}
