//! Playbook document and generation.
//!
//! A generated playbook holds exactly one play targeting the managed group.
//! Optional fields are modelled as `Option` and skipped when `None`: the
//! engine treats a missing `ignore_errors` differently from
//! `ignore_errors: false` in some configurations, so debug-only fields must
//! be absent, not defaulted, outside debug mode.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::error::Result;
use crate::inventory::MANAGED_GROUP;
use crate::runbook::Runbook;
use crate::tasks::compile_step;

/// Variable name task results are registered under in debug mode.
pub const RESULT_REGISTER: &str = "result";

/// `ansible_verbosity` applied to the play in debug mode.
pub const DEBUG_VERBOSITY: u8 = 2;

/// The generated playbook: a single-element sequence of plays.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybookDocument {
    play: Play,
}

impl PlaybookDocument {
    fn single(play: Play) -> Self {
        Self { play }
    }

    pub fn plays(&self) -> &[Play] {
        std::slice::from_ref(&self.play)
    }

    /// The play.
    pub fn play(&self) -> &Play {
        &self.play
    }

    /// Tasks of the play, in step order.
    pub fn tasks(&self) -> &[Task] {
        &self.play.tasks
    }

    /// Serializes the document to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Serialize for PlaybookDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.plays())
    }
}

/// A play within a playbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Play {
    /// Name of the play
    pub name: String,

    /// Host pattern to match against inventory
    pub hosts: String,

    /// Whether to gather facts before executing tasks
    pub gather_facts: bool,

    /// Become configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#become: Option<bool>,

    /// Play variables, present only in debug mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<IndexMap<String, serde_yaml::Value>>,

    /// Tasks in execution order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Play {
    /// Creates a play targeting the managed group with fact gathering off.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hosts: MANAGED_GROUP.to_string(),
            gather_facts: false,
            r#become: None,
            vars: None,
            tasks: Vec::new(),
        }
    }

    /// Sets `ansible_verbosity`.
    pub fn set_verbosity(&mut self, level: u8) {
        self.vars
            .get_or_insert_with(IndexMap::new)
            .insert("ansible_verbosity".to_string(), serde_yaml::Value::from(level));
    }
}

/// A task to execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Name of the task
    pub name: String,

    /// Become settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#become: Option<bool>,

    /// Module invocation; serializes as `<module>: <args>`
    #[serde(flatten)]
    pub action: TaskAction,

    /// Loop expression
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_: Option<String>,

    /// Register result in variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register: Option<String>,

    /// Whether to ignore errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_errors: Option<bool>,
}

/// Module invocation in a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// `debug: { msg }`, print only
    Debug { msg: String },
    /// `command: { cmd, stdin }`
    Command { cmd: String, stdin: String },
    /// `shell: <command>`
    Shell(String),
}

impl TaskAction {
    /// Module name as it appears in the playbook.
    pub fn module_name(&self) -> &'static str {
        match self {
            TaskAction::Debug { .. } => "debug",
            TaskAction::Command { .. } => "command",
            TaskAction::Shell(_) => "shell",
        }
    }
}

impl Task {
    /// Creates a task with no optional fields set.
    pub fn new(name: impl Into<String>, action: TaskAction) -> Self {
        Self {
            name: name.into(),
            r#become: None,
            action,
            loop_: None,
            register: None,
            ignore_errors: None,
        }
    }

    /// Returns true for print-only tasks.
    pub fn is_print_only(&self) -> bool {
        matches!(self.action, TaskAction::Debug { .. })
    }

    /// Registers the result and makes error handling explicit. Print-only
    /// tasks are left untouched.
    pub fn capture_result(&mut self) {
        if self.is_print_only() {
            return;
        }
        self.register = Some(RESULT_REGISTER.to_string());
        self.ignore_errors = Some(false);
    }
}

/// Builds the playbook document for a runbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybookGenerator;

impl PlaybookGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates the playbook. Debug is on if `debug` or the runbook's own
    /// default asks for it.
    pub fn generate(&self, runbook: &Runbook, debug: bool) -> PlaybookDocument {
        let debug = runbook.effective_debug(debug);
        let become_default = runbook.environment().r#become;

        let mut play = Play::new(runbook.name());
        play.r#become = become_default;
        if debug {
            play.set_verbosity(DEBUG_VERBOSITY);
        }

        play.tasks = runbook
            .steps()
            .iter()
            .map(|step| {
                let mut task = compile_step(step, become_default);
                if debug {
                    task.capture_result();
                }
                debug!(task = %task.name, module = task.action.module_name(), "compiled step");
                task
            })
            .collect();

        PlaybookDocument::single(play)
    }
}
