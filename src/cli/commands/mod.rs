//! Subcommands module for the runbook CLI
//!
//! This module contains all the subcommand implementations and the
//! arguments they share.

pub mod generate;
pub mod run;
pub mod validate;

use crate::cli::output::OutputFormatter;
use anyhow::Result;
use clap::Args;
use runbook::compiler::{CompiledArtifacts, RunbookCompiler};
use runbook::config::Config;
use runbook::inventory::InventoryMode;
use runbook::output::{write_artifacts, WrittenArtifacts};
use runbook::parser::load_runbook;
use runbook::runbook::Runbook;
use std::path::PathBuf;
use tracing::debug;

/// Common context shared between commands
pub struct CommandContext {
    /// Configuration
    pub config: Config,
    /// Output formatter
    pub output: OutputFormatter,
}

impl CommandContext {
    /// Create a new command context from CLI arguments
    pub fn new(cli: &crate::cli::Cli, config: Config) -> Self {
        let output = OutputFormatter::new(!cli.no_color, cli.is_json(), cli.verbosity());
        Self::from_parts(config, output)
    }

    pub fn from_parts(config: Config, output: OutputFormatter) -> Self {
        Self { config, output }
    }
}

/// Arguments shared by every command that compiles a runbook
#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    /// Path to the runbook file
    #[arg(required = true)]
    pub runbook: PathBuf,

    /// Directory the inventory and playbook are written to
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Enable debug mode (verbose engine output, captured task results)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// How localhost is rendered in the inventory (address-aware, uniform)
    #[arg(long)]
    pub inventory_mode: Option<InventoryMode>,
}

impl CompileArgs {
    /// Load and validate the runbook
    pub fn load(&self) -> Result<Runbook> {
        debug!(path = %self.runbook.display(), "loading runbook");
        Ok(load_runbook(&self.runbook)?)
    }

    pub fn compiler(&self, ctx: &CommandContext) -> RunbookCompiler {
        RunbookCompiler::new(self.inventory_mode.unwrap_or(ctx.config.inventory.mode))
    }

    pub fn output_dir(&self, ctx: &CommandContext) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| ctx.config.defaults.output_dir.clone())
    }

    /// Debug requested on the command line or in configuration
    pub fn debug_requested(&self, ctx: &CommandContext) -> bool {
        self.debug || ctx.config.defaults.debug
    }

    /// Compile the runbook in memory
    pub fn compile(&self, ctx: &CommandContext) -> Result<CompiledArtifacts> {
        let runbook = self.load()?;
        Ok(self
            .compiler(ctx)
            .compile(&runbook, self.debug_requested(ctx)))
    }

    /// Compile the runbook and write both artifacts
    pub fn compile_and_write(
        &self,
        ctx: &CommandContext,
    ) -> Result<(CompiledArtifacts, WrittenArtifacts)> {
        let artifacts = self.compile(ctx)?;
        let written = write_artifacts(
            &artifacts,
            &self.output_dir(ctx),
            &ctx.config.artifact_names(),
        )?;
        Ok((artifacts, written))
    }
}
