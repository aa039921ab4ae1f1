//! CLI definitions for containerssh-build
//!
//! This module contains the CLI argument parsing structure using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_MANIFEST;

#[derive(Parser, Debug)]
#[command(
    name = "containerssh-build",
    version,
    about = "Build, test and publish ContainerSSH images",
    long_about = "Reads build.yaml and, for every version, registry and tag, runs\n\
                  docker compose build/up/down. With --push, also logs in and\n\
                  publishes multi-arch images with docker buildx.\n\
                  Any unrecognised argument disables --push."
)]
pub struct Cli {
    /// Log in and push images after a successful test run
    #[arg(long)]
    pub push: bool,

    /// Path to the build manifest
    #[arg(long, env = "BUILD_MANIFEST", default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Unrecognised arguments; their presence means build/test only
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub rest: Vec<String>,
}

impl Cli {
    /// Publish only for a clean `--push` invocation
    pub fn push_enabled(&self) -> bool {
        self.push && self.rest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("containerssh-build").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults_to_build_only() {
        let cli = parse(&[]);
        assert!(!cli.push_enabled());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_push_flag() {
        assert!(parse(&["--push"]).push_enabled());
    }

    #[test]
    fn test_manifest_override() {
        let cli = parse(&["--manifest", "ci/build.yaml", "-v", "--push"]);
        assert_eq!(cli.manifest, PathBuf::from("ci/build.yaml"));
        assert!(cli.verbose);
        assert!(cli.push_enabled());
    }

    #[test]
    fn test_unknown_flag_runs_build_only() {
        let cli = parse(&["--bogus"]);
        assert_eq!(cli.rest, vec!["--bogus"]);
        assert!(!cli.push_enabled());
    }

    #[test]
    fn test_extra_argument_disables_push() {
        let cli = parse(&["--push", "extra"]);
        assert!(cli.push);
        assert_eq!(cli.rest, vec!["extra"]);
        assert!(!cli.push_enabled());

        assert!(!parse(&["--bogus", "--push"]).push_enabled());
    }
}
