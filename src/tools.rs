//! Runtime tool path resolution
//!
//! For each external tool (e.g., `docker`) we:
//! 1. Check for an environment variable `{TOOL}_BIN` (e.g., `DOCKER_BIN`)
//! 2. Fall back to the bare tool name, resolved through PATH when run
//!
//! This lets CI pin an exact engine binary (or a podman shim) without
//! changing the build manifest.

use crate::config::Environment;

/// Common tool names
pub mod tools {
    pub const DOCKER: &str = "docker";
}

/// Get the path to an external tool
///
/// Checks for an environment variable `{TOOL}_BIN` (uppercase tool name + "_BIN").
/// Falls back to the tool name itself if the envvar is unset or empty.
///
/// # Examples
///
/// ```rust,ignore
/// // With DOCKER_BIN="/usr/local/bin/docker"
/// assert_eq!(get_tool_path("docker", &env), "/usr/local/bin/docker");
///
/// // Without DOCKER_BIN set
/// assert_eq!(get_tool_path("docker", &env), "docker");
/// ```
pub fn get_tool_path(tool: &str, env: &Environment) -> String {
    let env_var = format!("{}_BIN", tool.to_uppercase().replace('-', "_"));
    env.get(&env_var)
        .map(str::to_string)
        .unwrap_or_else(|| tool.to_string())
}
