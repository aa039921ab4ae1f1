//! Build manifest (`build.yaml`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::registry::RegistryConfig;

/// Declarative description of what to build and where to publish it
///
/// Versions and registries are kept in sorted maps so builds run in a
/// stable order from one invocation to the next.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Build identifier appended to every tag (e.g., "20240115")
    #[serde(default)]
    pub revision: String,

    /// Version name → tags to publish it under
    #[serde(default)]
    pub versions: BTreeMap<String, Vec<String>>,

    /// Registry host → credential bindings
    #[serde(default)]
    pub registries: BTreeMap<String, RegistryConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
revision: "20240115"
versions:
  "0.4.1": ["0.4.1", "0.4", "latest"]
  "0.3.1": ["0.3.1", "0.3"]
registries:
  docker.io:
    user_variable: DOCKER_USERNAME
    password_variable: DOCKER_PASSWORD
  quay.io:
    user_variable: QUAY_USERNAME
    password_variable: QUAY_PASSWORD
    organisation_variable: QUAY_ORGANISATION
"#;
        let manifest: BuildManifest = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(manifest.revision, "20240115");
        assert_eq!(
            manifest.versions["0.4.1"],
            vec!["0.4.1", "0.4", "latest"]
        );
        assert_eq!(
            manifest.versions.keys().collect::<Vec<_>>(),
            vec!["0.3.1", "0.4.1"]
        );

        let docker = &manifest.registries["docker.io"];
        assert_eq!(docker.user_variable, "DOCKER_USERNAME");
        assert_eq!(docker.organisation_variable(), None);

        let quay = &manifest.registries["quay.io"];
        assert_eq!(quay.organisation_variable(), Some("QUAY_ORGANISATION"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let manifest: BuildManifest = serde_yaml::from_str("revision: abc123\n").unwrap();
        assert_eq!(manifest.revision, "abc123");
        assert!(manifest.versions.is_empty());
        assert!(manifest.registries.is_empty());

        let registry: RegistryConfig = serde_yaml::from_str("user_variable: U\n").unwrap();
        assert_eq!(registry.user_variable, "U");
        assert_eq!(registry.password_variable, "");
        assert_eq!(registry.organisation_variable(), None);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let result: Result<BuildManifest, _> = serde_yaml::from_str("versions: [1, 2]\n");
        assert!(result.is_err());
    }
}
