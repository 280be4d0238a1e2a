//! Execution of generated artifacts.
//!
//! The compiler never runs anything itself. Callers hand the written
//! inventory and playbook to an [`ExecutionAdapter`]; the default
//! [`AnsiblePlaybook`] adapter runs `ansible-playbook` with inherited
//! standard streams and waits for it to exit. There is no retry and no
//! timeout.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ExecutionConfig;
use crate::error::{Error, Result};

/// Runs generated artifacts through a configuration-management engine.
#[async_trait]
pub trait ExecutionAdapter: Send + Sync {
    /// Runs the playbook against the inventory. A non-zero exit is an
    /// [`Error::ExecutionFailed`].
    async fn run(&self, inventory: &Path, playbook: &Path, debug: bool) -> Result<()>;
}

/// Runs `ansible-playbook` as a subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiblePlaybook {
    executable: String,
    debug_verbosity: u8,
    extra_args: Vec<String>,
}

impl Default for AnsiblePlaybook {
    fn default() -> Self {
        Self::from_config(&ExecutionConfig::default())
    }
}

impl AnsiblePlaybook {
    /// Creates an adapter for the given executable name or path.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            debug_verbosity: config.debug_verbosity,
            extra_args: config.extra_args.clone(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Arguments passed to the executable, in order.
    pub fn args(&self, inventory: &Path, playbook: &Path, debug: bool) -> Vec<String> {
        let mut args = Vec::new();
        if debug && self.debug_verbosity > 0 {
            args.push(format!("-{}", "v".repeat(usize::from(self.debug_verbosity))));
        }
        args.push("-i".to_string());
        args.push(inventory.display().to_string());
        args.push(playbook.display().to_string());
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Locates the executable on `PATH` (or accepts an explicit path).
    pub fn resolve_program(&self) -> Result<PathBuf> {
        which::which(&self.executable).map_err(|e| {
            debug!(executable = %self.executable, error = %e, "lookup failed");
            Error::ExecutableNotFound(self.executable.clone())
        })
    }
}

#[async_trait]
impl ExecutionAdapter for AnsiblePlaybook {
    async fn run(&self, inventory: &Path, playbook: &Path, debug: bool) -> Result<()> {
        let program = self.resolve_program()?;
        let args = self.args(inventory, playbook, debug);

        info!(
            command = %format!("{} {}", program.display(), shell_words::join(&args)),
            "running playbook"
        );

        let status = Command::new(&program)
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::ExecutionFailed {
                program: self.executable.clone(),
                exit_code: status.code(),
            })
        }
    }
}
