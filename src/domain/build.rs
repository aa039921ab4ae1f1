//! Build domain types
//!
//! Defines the per-triple build workflow as an ordered list of steps.

use crate::error::{ProcessError, StepError, Triple};

/// Image published by the push phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Image {
    /// The ContainerSSH server image
    ContainerSsh,
    /// The auth/config test server image
    TestAuthConfig,
}

impl Image {
    /// Image name, which is also its build context directory
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContainerSsh => "containerssh",
            Self::TestAuthConfig => "containerssh-test-authconfig",
        }
    }
}

/// Individual steps in a triple build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    /// `compose build`
    Build,
    /// `compose up`, exit code taken from the `sut` service
    Test,
    /// `compose down`
    Cleanup,
    /// `login` to the registry
    Login,
    /// Multi-arch `buildx build --push` of one image
    Push(Image),
}

impl BuildStep {
    /// Get human-readable name for the step
    pub fn name(&self) -> &'static str {
        match self {
            Self::Build => "Build",
            Self::Test => "Integration Tests",
            Self::Cleanup => "Cleanup",
            Self::Login => "Login",
            Self::Push(Image::ContainerSsh) => "Push containerssh",
            Self::Push(Image::TestAuthConfig) => "Push containerssh-test-authconfig",
        }
    }

    /// Get emoji for the step
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Build => "🔨",
            Self::Test => "🧪",
            Self::Cleanup => "🧹",
            Self::Login => "🔑",
            Self::Push(_) => "📤",
        }
    }

    /// Attribute a process failure to this step
    pub fn failure(&self, triple: Triple, source: ProcessError) -> StepError {
        match self {
            Self::Build => StepError::BuildFailed { triple, source },
            Self::Test => StepError::TestFailed { triple, source },
            Self::Cleanup => StepError::CleanupFailed { triple, source },
            Self::Login | Self::Push(_) => StepError::PushFailed { triple, source },
        }
    }
}

/// State of one triple while it builds
///
/// Collects the combined output of every step so it can be reported as a
/// single block once the triple finishes.
#[derive(Debug)]
pub struct BuildAttempt {
    pub triple: Triple,
    pub output: Vec<u8>,
}

impl BuildAttempt {
    pub fn new(version: &str, registry_prefix: &str, tag: &str) -> Self {
        Self {
            triple: Triple {
                version: version.to_string(),
                registry: registry_prefix.to_string(),
                tag: tag.to_string(),
            },
            output: Vec::new(),
        }
    }
}
