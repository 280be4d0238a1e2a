//! Runbook data model.
//!
//! Source text deserializes into the loosely-typed `Raw*` records, which
//! mirror the source format field for field. [`Runbook::from_raw`] then
//! validates them into the strongly-typed model the compiler consumes:
//! required fields are checked here and every step is classified into a
//! closed [`StepKind`] once, so later stages never probe optional fields.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::environment::Environment;
use crate::error::{Error, Result};

// ============================================================================
// Raw (source-facing) records
// ============================================================================

/// A runbook exactly as it appears in the source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRunbook {
    /// Runbook name, used as the play name
    #[serde(default)]
    pub name: Option<String>,

    /// Informational description
    #[serde(default)]
    pub description: Option<String>,

    /// Debug mode default
    #[serde(default)]
    pub debug: Option<bool>,

    /// Global connection environment
    #[serde(default, alias = "environment")]
    pub env: Environment,

    /// Target hosts
    #[serde(default)]
    pub hosts: Vec<RawHost>,

    /// Ordered steps
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

/// A host entry as it appears in the source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHost {
    /// Hostname, IP or `localhost`
    #[serde(default, alias = "address")]
    pub addr: Option<String>,

    /// Per-host environment override
    #[serde(default, alias = "environment")]
    pub env: Option<Environment>,
}

/// A step as it appears in the source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStep {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub r#become: Option<bool>,

    #[serde(default)]
    pub stdin: Option<String>,

    #[serde(default, alias = "message")]
    pub msg: Option<String>,

    #[serde(default, rename = "loop")]
    pub loop_: Option<String>,
}

// ============================================================================
// Validated model
// ============================================================================

/// A validated runbook: named, with at least one host and one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Runbook {
    name: String,
    description: Option<String>,
    debug_default: bool,
    environment: Environment,
    hosts: Vec<HostEntry>,
    steps: Vec<Step>,
}

impl Runbook {
    /// Creates a runbook, enforcing the required-field rules.
    pub fn new(
        name: impl Into<String>,
        environment: Environment,
        hosts: Vec<HostEntry>,
        steps: Vec<Step>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::validation("missing required field 'name'"));
        }
        if hosts.is_empty() {
            return Err(Error::validation("runbook must define at least one host"));
        }
        if let Some(pos) = hosts.iter().position(|h| h.address.trim().is_empty()) {
            return Err(Error::validation(format!(
                "host {} is missing required field 'addr'",
                pos + 1
            )));
        }
        if steps.is_empty() {
            return Err(Error::validation("runbook must define at least one step"));
        }

        Ok(Self {
            name,
            description: None,
            debug_default: false,
            environment,
            hosts,
            steps,
        })
    }

    /// Validates raw source records into a runbook.
    pub fn from_raw(raw: RawRunbook) -> Result<Self> {
        let name = raw
            .name
            .ok_or_else(|| Error::validation("missing required field 'name'"))?;

        let hosts = raw
            .hosts
            .into_iter()
            .enumerate()
            .map(|(idx, host)| HostEntry::from_raw(idx + 1, host))
            .collect::<Result<Vec<_>>>()?;

        let steps = raw
            .steps
            .into_iter()
            .enumerate()
            .map(|(idx, step)| Step::from_raw(idx + 1, step))
            .collect::<Result<Vec<_>>>()?;

        let mut runbook = Self::new(name, raw.env, hosts, steps)?;
        runbook.description = raw.description;
        runbook.debug_default = raw.debug.unwrap_or(false);
        Ok(runbook)
    }

    /// Sets the runbook's own debug default.
    pub fn with_debug_default(mut self, debug: bool) -> Self {
        self.debug_default = debug;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn debug_default(&self) -> bool {
        self.debug_default
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn hosts(&self) -> &[HostEntry] {
        &self.hosts
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Debug is on if either the caller or the runbook asks for it.
    pub fn effective_debug(&self, requested: bool) -> bool {
        requested || self.debug_default
    }
}

/// A target host with an optional environment override.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
    /// Hostname, IP or `localhost`
    pub address: String,
    /// Field-wise override of the runbook environment
    pub environment_override: Option<Environment>,
}

impl HostEntry {
    /// Creates a host with no override.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            environment_override: None,
        }
    }

    /// Attaches an environment override.
    pub fn with_override(mut self, env: Environment) -> Self {
        self.environment_override = Some(env);
        self
    }

    /// Returns true for the literal `localhost` address.
    pub fn is_localhost(&self) -> bool {
        self.address == "localhost"
    }

    fn from_raw(index: usize, raw: RawHost) -> Result<Self> {
        let address = raw.addr.ok_or_else(|| {
            Error::validation(format!("host {index} is missing required field 'addr'"))
        })?;
        Ok(Self {
            address,
            environment_override: raw.env,
        })
    }
}

/// A single runbook step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Step name, used as the task name
    pub name: String,
    /// What the step does
    pub kind: StepKind,
    /// Optional loop expression, passed through to the task
    pub loop_expr: Option<String>,
}

/// The three step shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Print-only step with no effect on the host
    Message { message: String },
    /// Command run with `stdin` piped to it
    StdinCommand {
        command: String,
        stdin: String,
        become_override: Option<bool>,
    },
    /// Command run through a shell
    Shell {
        command: String,
        become_override: Option<bool>,
    },
}

impl StepKind {
    /// Short label for reporting.
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Message { .. } => "message",
            StepKind::StdinCommand { .. } => "stdin-command",
            StepKind::Shell { .. } => "shell",
        }
    }
}

impl Step {
    /// Creates a shell step.
    pub fn shell(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            StepKind::Shell {
                command: command.into(),
                become_override: None,
            },
        )
    }

    /// Creates a command step fed from `stdin`.
    pub fn stdin_command(
        name: impl Into<String>,
        command: impl Into<String>,
        stdin: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            name,
            StepKind::StdinCommand {
                command: command.into(),
                stdin: stdin.into(),
                become_override: None,
            },
        )
    }

    /// Creates a print-only step.
    pub fn message(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            StepKind::Message {
                message: message.into(),
            },
        )
    }

    fn with_kind(name: impl Into<String>, kind: StepKind) -> Self {
        Self {
            name: name.into(),
            kind,
            loop_expr: None,
        }
    }

    /// Overrides privilege escalation. No effect on message steps.
    pub fn with_become(mut self, value: bool) -> Self {
        match &mut self.kind {
            StepKind::StdinCommand {
                become_override, ..
            }
            | StepKind::Shell {
                become_override, ..
            } => *become_override = Some(value),
            StepKind::Message { .. } => {}
        }
        self
    }

    /// Sets the loop expression.
    pub fn with_loop(mut self, expr: impl Into<String>) -> Self {
        self.loop_expr = Some(expr.into());
        self
    }

    /// Classifies a raw step: `msg` wins, then `stdin`, then plain `command`.
    fn from_raw(index: usize, raw: RawStep) -> Result<Self> {
        let name = raw.name.ok_or_else(|| {
            Error::validation(format!("step {index} is missing required field 'name'"))
        })?;

        let kind = match (raw.msg, raw.command, raw.stdin) {
            (Some(message), command, stdin) => {
                if command.is_some() || stdin.is_some() {
                    warn!(step = %name, "step defines 'msg'; ignoring 'command'/'stdin'");
                }
                StepKind::Message { message }
            }
            (None, Some(command), Some(stdin)) => StepKind::StdinCommand {
                command,
                stdin,
                become_override: raw.r#become,
            },
            (None, Some(command), None) => StepKind::Shell {
                command,
                become_override: raw.r#become,
            },
            (None, None, _) => return Err(Error::InvalidStep { index, name }),
        };

        Ok(Self {
            name,
            kind,
            loop_expr: raw.loop_,
        })
    }
}
