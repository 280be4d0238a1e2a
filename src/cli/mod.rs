//! CLI module for the runbook compiler
//!
//! This module provides the command-line interface: argument parsing and
//! subcommand handling.

pub mod commands;
pub mod completions;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Runbook - compile declarative runbooks into Ansible inventories and playbooks
#[derive(Parser, Debug, Clone)]
#[command(name = "runbook")]
#[command(author = "Runbook CLI Contributors")]
#[command(version)]
#[command(about = "Compile declarative runbooks into Ansible inventories and playbooks", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "RUNBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile a runbook into an inventory and a playbook
    Generate(commands::generate::GenerateArgs),

    /// Compile a runbook, then run it with ansible-playbook
    Run(commands::run::RunArgs),

    /// Check a runbook without writing anything
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

/// Arguments for the completions command
#[derive(Parser, Debug, Clone)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Print installation instructions instead of the script
    #[arg(long)]
    pub instructions: bool,
}

impl CompletionsArgs {
    pub fn execute(&self) -> i32 {
        if self.instructions {
            completions::print_installation_instructions(self.shell);
        } else {
            completions::generate_completions(self.shell);
        }
        0
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Check if JSON output is requested
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}
