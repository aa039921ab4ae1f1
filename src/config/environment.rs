//! Snapshot of the process environment.
//!
//! Credentials and the GitHub token are looked up by name at build time.
//! Taking the snapshot once at startup keeps the build driver free of
//! global state and lets tests supply their own variables.

use std::collections::HashMap;

/// Read-only view of environment variables
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Look up a variable, treating an empty value as unset
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_unset() {
        let env: Environment = [("ORG", ""), ("USER", "bot")].into_iter().collect();
        assert_eq!(env.get("ORG"), None);
        assert_eq!(env.get("USER"), Some("bot"));
        assert_eq!(env.get("MISSING"), None);
    }
}
