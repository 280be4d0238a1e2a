//! Connection environment and per-host precedence.
//!
//! An [`Environment`] carries the connection settings a host is reached
//! with. Every field is optional: `None` means "not specified", which is
//! different from an empty string or `false`. A host's effective
//! environment is the runbook's global environment overlaid field by field
//! with the host's own override.

use serde::{Deserialize, Serialize};

/// Connection settings shared by hosts, overridable per host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Remote user to connect as
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Path to the SSH private key
    #[serde(
        default,
        alias = "ssh_key_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub ssh_key: Option<String>,

    /// Path to the remote Python interpreter
    #[serde(
        default,
        alias = "python_interpreter",
        skip_serializing_if = "Option::is_none"
    )]
    pub python: Option<String>,

    /// Privilege escalation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#become: Option<bool>,
}

impl Environment {
    /// Creates an environment with no fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the remote user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the SSH private key path.
    pub fn with_ssh_key(mut self, path: impl Into<String>) -> Self {
        self.ssh_key = Some(path.into());
        self
    }

    /// Sets the Python interpreter path.
    pub fn with_python(mut self, path: impl Into<String>) -> Self {
        self.python = Some(path.into());
        self
    }

    /// Sets privilege escalation.
    pub fn with_become(mut self, r#become: bool) -> Self {
        self.r#become = Some(r#become);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.ssh_key.is_none() && self.python.is_none() && self.r#become.is_none()
    }

    /// Overlays `other` on top of `self`; fields set in `other` win.
    pub fn overlay(&self, other: &Environment) -> Environment {
        Environment {
            user: other.user.clone().or_else(|| self.user.clone()),
            ssh_key: other.ssh_key.clone().or_else(|| self.ssh_key.clone()),
            python: other.python.clone().or_else(|| self.python.clone()),
            r#become: other.r#become.or(self.r#become),
        }
    }
}

/// Resolves the effective environment for one host.
///
/// Must be called per host: two hosts sharing a base may carry different
/// overrides.
pub fn resolve(base: &Environment, host_override: Option<&Environment>) -> Environment {
    match host_override {
        Some(over) => base.overlay(over),
        None => base.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_override_wins_and_base_fills_gaps() {
        let base = Environment::new().with_user("root").with_become(true);
        let over = Environment::new().with_user("deploy");

        let resolved = resolve(&base, Some(&over));
        assert_eq!(
            resolved,
            Environment::new().with_user("deploy").with_become(true)
        );
    }

    #[test]
    fn test_no_override_is_base() {
        let base = Environment::new()
            .with_python("/usr/bin/python3")
            .with_ssh_key("~/.ssh/id_ed25519");
        assert_eq!(resolve(&base, None), base);
    }

    #[test]
    fn test_false_override_is_not_absence() {
        let base = Environment::new().with_become(true);
        let over = Environment::new().with_become(false);
        assert_eq!(resolve(&base, Some(&over)).r#become, Some(false));
    }

    #[test]
    fn test_absent_in_both_stays_absent() {
        let resolved = resolve(&Environment::new(), Some(&Environment::new()));
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_deserialize_aliases() {
        let env: Environment =
            toml::from_str("ssh_key_path = \"/k\"\npython_interpreter = \"/p\"\nbecome = false")
                .unwrap();
        assert_eq!(env.ssh_key.as_deref(), Some("/k"));
        assert_eq!(env.python.as_deref(), Some("/p"));
        assert_eq!(env.r#become, Some(false));
        assert_eq!(env.user, None);
    }
}
