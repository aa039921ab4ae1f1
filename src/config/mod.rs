//! # Build Configuration
//!
//! The build is described by a single manifest, `build.yaml`, in the working
//! directory:
//!
//! ```yaml
//! revision: "20240115"
//! versions:
//!   "0.4.1": ["0.4.1", "0.4", "latest"]
//! registries:
//!   docker.io:
//!     user_variable: DOCKER_USERNAME
//!     password_variable: DOCKER_PASSWORD
//!   quay.io:
//!     user_variable: QUAY_USERNAME
//!     password_variable: QUAY_PASSWORD
//!     organisation_variable: QUAY_ORGANISATION
//! ```
//!
//! Registry entries name environment variables, which are read through
//! [`Environment`] when a build needs them.

mod environment;
mod manifest;
mod registry;

pub use environment::Environment;
pub use manifest::BuildManifest;
pub use registry::RegistryConfig;

use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;

/// Default manifest file name, relative to the working directory
pub const DEFAULT_MANIFEST: &str = "build.yaml";

/// Load and parse a build manifest from disk
pub fn load_manifest(path: &Path) -> Result<BuildManifest, ConfigError> {
    let path_str = path.display().to_string();
    debug!("Loading manifest from {}", path_str);

    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path_str.clone(),
            }
        } else {
            ConfigError::ReadFailed {
                path: path_str.clone(),
                source,
            }
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path_str,
        message: e.to_string(),
    })
}
