//! Registry credential configuration for container image publishing.

use serde::{Deserialize, Serialize};

/// Credential bindings for one container registry
///
/// Every field names an environment variable; the manifest never holds the
/// secret values themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Variable holding the registry username (e.g., "DOCKER_USERNAME")
    #[serde(default)]
    pub user_variable: String,

    /// Variable holding the registry password or token
    #[serde(default)]
    pub password_variable: String,

    /// Variable holding the organisation to publish under (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_variable: Option<String>,
}

impl RegistryConfig {
    /// Organisation variable name, if one is configured
    ///
    /// An empty name counts as not configured.
    pub fn organisation_variable(&self) -> Option<&str> {
        self.organisation_variable
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}
