//! # Runbook - Declarative runbooks for Ansible
//!
//! Runbook compiles a small declarative runbook (a name, a shared connection
//! environment, a list of hosts and an ordered list of steps) into the two
//! artifacts `ansible-playbook` consumes: an INI inventory and a YAML
//! playbook. It can then hand those artifacts to the engine and report the
//! engine's exit status.
//!
//! ## Core Concepts
//!
//! - **Runbook**: The validated source document
//! - **Environment**: Connection settings shared by every host, overridable per host
//! - **Steps**: Shell commands, commands fed from stdin, or print-only messages
//! - **Inventory**: One `[managed]` group, one line per host
//! - **Playbook**: One play targeting `managed`, one task per step
//!
//! ## Architecture Overview
//!
//! ```text
//!   runbook.toml
//!        │
//!        ▼
//! ┌──────────────┐    ┌───────────────────────────────────────────┐
//! │    parser    │───▶│                 compiler                  │
//! │ (toml/yaml)  │    │  ┌─────────────┐      ┌────────────────┐  │
//! └──────────────┘    │  │  inventory  │      │    playbook    │  │
//!                     │  │ (host vars) │      │ (tasks per     │  │
//!                     │  └─────────────┘      │  step)         │  │
//!                     │                       └────────────────┘  │
//!                     └───────────────────────────────────────────┘
//!                                        │
//!                                        ▼
//!                     ┌───────────────────────────────────────────┐
//!                     │   output (atomic write) ─▶ executor       │
//!                     │                          (ansible-playbook)│
//!                     └───────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use runbook::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let runbook = load_runbook("deploy.toml")?;
//!     let artifacts = RunbookCompiler::default().compile(&runbook, false);
//!     let written = write_artifacts(&artifacts, Path::new("generated"), &ArtifactNames::default())?;
//!     println!("{}", written.playbook_path.display());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::compiler::{CompiledArtifacts, RunbookCompiler};
    pub use crate::config::Config;
    pub use crate::environment::{resolve, Environment};
    pub use crate::error::{Error, Result};
    pub use crate::executor::{AnsiblePlaybook, ExecutionAdapter};
    pub use crate::inventory::{InventoryDocument, InventoryGenerator, InventoryMode};
    pub use crate::output::{write_artifacts, ArtifactNames, WrittenArtifacts};
    pub use crate::parser::{load_runbook, parse_runbook, SourceFormat};
    pub use crate::playbook::{PlaybookDocument, PlaybookGenerator, Task, TaskAction};
    pub use crate::runbook::{HostEntry, Runbook, Step, StepKind};
}

// ============================================================================
// Core Modules
// ============================================================================

/// Error types and result aliases.
///
/// Errors are grouped into source, structural, artifact, execution and
/// configuration failures; [`Error::exit_code`](error::Error::exit_code)
/// maps each to a process exit status.
pub mod error;

/// Connection environment and per-host override resolution.
pub mod environment;

/// The validated runbook model and its raw deserialized form.
pub mod runbook;

/// Runbook source parsing (TOML, YAML, JSON).
pub mod parser;

// ============================================================================
// Generation
// ============================================================================

/// Inventory generation.
///
/// Renders one `[managed]` group with a line per host. How `localhost` is
/// rendered depends on the [`InventoryMode`](inventory::InventoryMode).
pub mod inventory;

/// Step to task mapping.
pub mod tasks;

/// Playbook document model and generation.
pub mod playbook;

/// Compiles a runbook into both documents.
pub mod compiler;

// ============================================================================
// I/O Boundary
// ============================================================================

/// Atomic artifact writing.
pub mod output;

/// Running generated artifacts through `ansible-playbook`.
pub mod executor;

/// Layered configuration: defaults, files, environment.
pub mod config;

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of Runbook.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns detailed version information including build metadata.
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: version(),
        rust_version: option_env!("CARGO_PKG_RUST_VERSION").unwrap_or("unknown"),
        target: std::env::consts::ARCH,
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    }
}

/// Version information for the build.
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Semantic version string
    pub version: &'static str,
    /// Minimum Rust version required
    pub rust_version: &'static str,
    /// Target architecture
    pub target: &'static str,
    /// Build profile (debug or release)
    pub profile: &'static str,
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "runbook {} ({}, {})", self.version, self.target, self.profile)
    }
}
