//! Registry naming and credential resolution

use std::fmt;

use crate::config::{Environment, RegistryConfig};
use crate::error::CredentialError;

/// Project path segment every image is published under
pub const PROJECT: &str = "containerssh";

/// Compute the image prefix for a registry
///
/// Returns `<registry>/containerssh`, or `<registry>/<organisation>/containerssh`
/// when the registry names an organisation variable. A configured but empty
/// organisation variable is an error.
pub fn registry_prefix(
    registry_name: &str,
    registry: &RegistryConfig,
    env: &Environment,
) -> Result<String, CredentialError> {
    match registry.organisation_variable() {
        None => Ok(format!("{}/{}", registry_name, PROJECT)),
        Some(variable) => {
            let organisation = env.get(variable).ok_or_else(|| {
                CredentialError::MissingOrganisation {
                    variable: variable.to_string(),
                }
            })?;
            Ok(format!("{}/{}/{}", registry_name, organisation, PROJECT))
        }
    }
}

/// Login credentials for a registry
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
}

impl RegistryCredentials {
    /// Resolve username and password from the variables the registry names
    pub fn resolve(registry: &RegistryConfig, env: &Environment) -> Result<Self, CredentialError> {
        let username = env.get(&registry.user_variable).ok_or_else(|| {
            CredentialError::MissingUsername {
                variable: registry.user_variable.clone(),
            }
        })?;
        let password = env.get(&registry.password_variable).ok_or_else(|| {
            CredentialError::MissingPassword {
                variable: registry.password_variable.clone(),
            }
        })?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
