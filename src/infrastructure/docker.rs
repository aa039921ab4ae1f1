//! Container engine CLI
//!
//! Builds the `docker` invocations for each build step. Nothing here runs a
//! process; the invocations are handed to a [`ProcessRunner`].
//!
//! [`ProcessRunner`]: super::process::ProcessRunner

use crate::config::Environment;
use crate::domain::{Image, RegistryCredentials};
use crate::tools::{get_tool_path, tools};

use super::process::Invocation;

/// Platforms every published image is built for
pub const PLATFORMS: &str = "linux/amd64,linux/arm64";

/// Compose service whose exit code decides the integration test result
pub const TEST_SERVICE: &str = "sut";

/// Build settings shared by every step of one triple
#[derive(Debug, Clone)]
pub struct BuildTarget<'a> {
    pub version: &'a str,
    pub tag: &'a str,
    /// Image prefix without trailing slash (e.g., "docker.io/containerssh")
    pub registry_prefix: &'a str,
    pub github_token: &'a str,
}

impl BuildTarget<'_> {
    /// Environment for every engine call of this triple
    pub fn env(&self) -> Vec<(String, String)> {
        vec![
            ("CONTAINERSSH_VERSION".to_string(), self.version.to_string()),
            ("CONTAINERSSH_TAG".to_string(), self.tag.to_string()),
            ("GITHUB_TOKEN".to_string(), self.github_token.to_string()),
            ("REGISTRY".to_string(), format!("{}/", self.registry_prefix)),
        ]
    }

    /// Fully qualified reference for an image of this triple
    pub fn image_ref(&self, image: Image) -> String {
        format!("{}/{}:{}", self.registry_prefix, image.name(), self.tag)
    }
}

/// The container engine binary
#[derive(Debug, Clone)]
pub struct ContainerEngine {
    program: String,
}

impl ContainerEngine {
    /// Use `DOCKER_BIN` if set, else `docker` from PATH
    pub fn discover(env: &Environment) -> Self {
        Self::new(get_tool_path(tools::DOCKER, env))
    }

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// `compose build`
    pub fn compose_build(&self, target: &BuildTarget) -> Invocation {
        Invocation::new(&self.program, ["compose", "build"], &target.env())
    }

    /// `compose up`, stopping everything once the test service exits
    pub fn compose_up(&self, target: &BuildTarget) -> Invocation {
        Invocation::new(
            &self.program,
            [
                "compose".to_string(),
                "up".to_string(),
                "--abort-on-container-exit".to_string(),
                format!("--exit-code-from={}", TEST_SERVICE),
            ],
            &target.env(),
        )
    }

    /// `compose down`
    pub fn compose_down(&self, target: &BuildTarget) -> Invocation {
        Invocation::new(&self.program, ["compose", "down"], &target.env())
    }

    /// `login`, with the password on stdin
    pub fn login(
        &self,
        registry_name: &str,
        credentials: &RegistryCredentials,
        target: &BuildTarget,
    ) -> Invocation {
        Invocation::new(
            &self.program,
            [
                "login",
                registry_name,
                "-u",
                credentials.username.as_str(),
                "--password-stdin",
            ],
            &target.env(),
        )
        .with_stdin(credentials.password.as_bytes())
    }

    /// Multi-arch `buildx build --push` of `image` from its context directory
    pub fn buildx_push(&self, image: Image, target: &BuildTarget) -> Invocation {
        Invocation::new(
            &self.program,
            [
                "buildx".to_string(),
                "build".to_string(),
                "--push".to_string(),
                "--platform".to_string(),
                PLATFORMS.to_string(),
                "--build-arg".to_string(),
                format!("CONTAINERSSH_VERSION={}", target.version),
                "--build-arg".to_string(),
                format!("CONTAINERSSH_TAG={}", target.tag),
                "-t".to_string(),
                target.image_ref(image),
                image.name().to_string(),
            ],
            &target.env(),
        )
    }
}
