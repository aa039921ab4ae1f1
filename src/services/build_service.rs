//! Build service - drives the build matrix
//!
//! For every (registry, tag) of a version this service runs, in order:
//! compose build, compose up (integration tests), compose down, and when
//! publishing, login plus a multi-arch push of each image. The first failure
//! is reported and ends the whole run.

use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, info};

use crate::config::{Environment, RegistryConfig};
use crate::domain::{expand_tags, registry_prefix, BuildAttempt, BuildStep, Image, RegistryCredentials};
use crate::error::{BuildError, StepError};
use crate::infrastructure::{BuildTarget, ContainerEngine, Invocation, ProcessRunner};
use crate::ui;

/// Service for building and publishing image versions
pub struct BuildService<R, W> {
    runner: R,
    engine: ContainerEngine,
    env: Environment,
    /// Destination for report blocks
    out: W,
    push: bool,
    built: usize,
}

impl<R: ProcessRunner, W: Write> BuildService<R, W> {
    /// Create a build service that verifies images without publishing them
    pub fn new(runner: R, engine: ContainerEngine, env: Environment, out: W) -> Self {
        Self {
            runner,
            engine,
            env,
            out,
            push: false,
            built: 0,
        }
    }

    /// Enable or disable the login and push phase
    pub fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    /// Number of triples that completed successfully so far
    pub fn built(&self) -> usize {
        self.built
    }

    /// Build one version for every registry and expanded tag
    ///
    /// Stops at the first failing triple and returns its error.
    pub async fn build_version(
        &mut self,
        version: &str,
        tags: &[String],
        revision: &str,
        registries: &BTreeMap<String, RegistryConfig>,
    ) -> Result<(), BuildError> {
        let tags = expand_tags(tags, revision);
        info!(
            "📦 Version {}: {} tag(s) x {} registry(ies)",
            version,
            tags.len(),
            registries.len()
        );

        for (registry_name, registry) in registries {
            for tag in &tags {
                self.build_triple(version, registry_name, registry, tag)
                    .await?;
            }
        }

        Ok(())
    }

    async fn build_triple(
        &mut self,
        version: &str,
        registry_name: &str,
        registry: &RegistryConfig,
        tag: &str,
    ) -> Result<(), BuildError> {
        let prefix = registry_prefix(registry_name, registry, &self.env)?;
        let target = BuildTarget {
            version,
            tag,
            registry_prefix: &prefix,
            github_token: self.env.get("GITHUB_TOKEN").unwrap_or_default(),
        };
        let mut attempt = BuildAttempt::new(version, &prefix, tag);

        info!("🔨 Building version={} registry={} tag={}", version, prefix, tag);

        match self
            .run_steps(registry_name, registry, &target, &mut attempt)
            .await
        {
            Ok(()) => {
                ui::write_report(&mut self.out, &attempt, None)?;
                self.built += 1;
                Ok(())
            }
            Err(BuildError::Step(e)) => {
                ui::write_report(&mut self.out, &attempt, Some(&e))?;
                Err(e.into())
            }
            Err(e) => Err(e),
        }
    }

    async fn run_steps(
        &self,
        registry_name: &str,
        registry: &RegistryConfig,
        target: &BuildTarget<'_>,
        attempt: &mut BuildAttempt,
    ) -> Result<(), BuildError> {
        // No teardown after a failed build or test run
        self.run_step(BuildStep::Build, self.engine.compose_build(target), attempt)
            .await?;
        self.run_step(BuildStep::Test, self.engine.compose_up(target), attempt)
            .await?;
        self.run_step(BuildStep::Cleanup, self.engine.compose_down(target), attempt)
            .await?;

        if !self.push {
            return Ok(());
        }

        let credentials = RegistryCredentials::resolve(registry, &self.env)?;
        self.run_step(
            BuildStep::Login,
            self.engine.login(registry_name, &credentials, target),
            attempt,
        )
        .await?;

        for image in [Image::ContainerSsh, Image::TestAuthConfig] {
            self.run_step(
                BuildStep::Push(image),
                self.engine.buildx_push(image, target),
                attempt,
            )
            .await?;
        }

        Ok(())
    }

    async fn run_step(
        &self,
        step: BuildStep,
        invocation: Invocation,
        attempt: &mut BuildAttempt,
    ) -> Result<(), StepError> {
        info!("   {} {}", step.emoji(), step.name());
        debug!("   {}", invocation.command_line());

        self.runner
            .run(&invocation, &mut attempt.output)
            .await
            .map_err(|e| step.failure(attempt.triple.clone(), e))
    }
}
