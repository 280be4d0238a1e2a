//! Inventory generation.
//!
//! Builds the INI inventory document: a `[managed]` group header followed by
//! one line per runbook host, in host order. Each host's line is derived
//! from its effective environment (see [`crate::environment::resolve`]).
//!
//! Two formatting policies exist for `localhost`, selected by
//! [`InventoryMode`]:
//!
//! - [`InventoryMode::AddressAware`] (default): `localhost` gets
//!   `ansible_connection=local` plus interpreter and become; user and key
//!   are dropped. Other hosts get user, key, interpreter and become.
//! - [`InventoryMode::Uniform`]: every host, `localhost` included, gets
//!   user, key, interpreter and become.

pub mod host;

pub use host::{ConnectionType, HostLine};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::environment::{self, Environment};
use crate::error::Error;
use crate::runbook::HostEntry;
use host::{ANSIBLE_BECOME, ANSIBLE_CONNECTION, ANSIBLE_PYTHON, ANSIBLE_SSH_KEY, ANSIBLE_USER};

/// Group every generated host belongs to. The playbook targets it too.
pub const MANAGED_GROUP: &str = "managed";

/// How `localhost` entries are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InventoryMode {
    /// Special-case `localhost` as a local connection
    #[default]
    AddressAware,
    /// Render every host the same way
    Uniform,
}

impl fmt::Display for InventoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryMode::AddressAware => write!(f, "address-aware"),
            InventoryMode::Uniform => write!(f, "uniform"),
        }
    }
}

impl FromStr for InventoryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "address-aware" => Ok(InventoryMode::AddressAware),
            "uniform" => Ok(InventoryMode::Uniform),
            other => Err(Error::InvalidConfig {
                key: "inventory.mode".to_string(),
                message: format!("unknown mode '{other}', expected 'address-aware' or 'uniform'"),
            }),
        }
    }
}

/// The generated inventory: a group header and ordered host lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryDocument {
    group: String,
    hosts: Vec<HostLine>,
}

impl InventoryDocument {
    /// The `[group]` header line.
    pub fn header(&self) -> String {
        format!("[{}]", self.group)
    }

    pub fn hosts(&self) -> &[HostLine] {
        &self.hosts
    }

    /// All lines, header first.
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.header())
            .chain(self.hosts.iter().map(ToString::to_string))
            .collect()
    }

    /// Renders the file contents, one line per entry, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for InventoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Builds inventory documents under one [`InventoryMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryGenerator {
    mode: InventoryMode,
}

impl InventoryGenerator {
    pub fn new(mode: InventoryMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> InventoryMode {
        self.mode
    }

    /// Generates the inventory. An empty host list yields the header alone.
    pub fn generate(&self, hosts: &[HostEntry], base: &Environment) -> InventoryDocument {
        let hosts = hosts
            .iter()
            .map(|host| {
                let env = environment::resolve(base, host.environment_override.as_ref());
                let line = self.host_line(host, &env);
                debug!(host = %host.address, line = %line, "inventory line");
                line
            })
            .collect();

        InventoryDocument {
            group: MANAGED_GROUP.to_string(),
            hosts,
        }
    }

    fn connection_type(&self, host: &HostEntry) -> ConnectionType {
        match self.mode {
            InventoryMode::AddressAware if host.is_localhost() => ConnectionType::Local,
            _ => ConnectionType::Ssh,
        }
    }

    fn host_line(&self, host: &HostEntry, env: &Environment) -> HostLine {
        let mut line = HostLine::new(&host.address);
        match self.connection_type(host) {
            ConnectionType::Local => {
                line.set(ANSIBLE_CONNECTION, Some(ConnectionType::Local));
            }
            ConnectionType::Ssh => {
                line.set(ANSIBLE_USER, env.user.as_deref())
                    .set(ANSIBLE_SSH_KEY, env.ssh_key.as_deref());
            }
        }
        line.set(ANSIBLE_PYTHON, env.python.as_deref())
            .set(ANSIBLE_BECOME, env.r#become);
        line
    }
}
