//! Inventory host lines.
//!
//! A [`HostLine`] is one `address key=value ...` line of an INI inventory.
//! Tokens keep insertion order so output is stable across runs.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

/// Host variable: remote user.
pub const ANSIBLE_USER: &str = "ansible_user";
/// Host variable: SSH private key path.
pub const ANSIBLE_SSH_KEY: &str = "ansible_ssh_private_key_file";
/// Host variable: Python interpreter.
pub const ANSIBLE_PYTHON: &str = "ansible_python_interpreter";
/// Host variable: privilege escalation.
pub const ANSIBLE_BECOME: &str = "ansible_become";
/// Host variable: connection plugin.
pub const ANSIBLE_CONNECTION: &str = "ansible_connection";

/// Connection type for a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionType {
    /// SSH connection (default)
    #[default]
    Ssh,
    /// Local connection (no SSH)
    Local,
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionType::Ssh => write!(f, "ssh"),
            ConnectionType::Local => write!(f, "local"),
        }
    }
}

/// One host line in an INI inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLine {
    address: String,
    vars: IndexMap<&'static str, String>,
}

impl HostLine {
    /// Creates a line with no variables.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            vars: IndexMap::new(),
        }
    }

    /// Adds a variable if it has a value. Absent values emit no token.
    pub fn set(&mut self, key: &'static str, value: Option<impl ToString>) -> &mut Self {
        if let Some(value) = value {
            self.vars.insert(key, value.to_string());
        }
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Looks up a variable value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

}

impl fmt::Display for HostLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)?;
        for (key, value) in &self.vars {
            write!(f, " {}={}", key, quote_value(value))?;
        }
        Ok(())
    }
}

/// Ansible splits INI host lines with shlex, so values containing
/// whitespace, quotes, backslashes or comment markers must be quoted.
fn quote_value(value: &str) -> Cow<'_, str> {
    let needs_quoting = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\' | '#' | ';'));
    if needs_quoting {
        shell_words::quote(value)
    } else {
        Cow::Borrowed(value)
    }
}
