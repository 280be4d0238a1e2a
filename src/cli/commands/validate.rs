//! Validate command - Check a runbook without writing artifacts
//!
//! Parses and compiles the runbook in memory. With `--print` the rendered
//! inventory and playbook go to stdout instead of disk.

use super::{CommandContext, CompileArgs};
use anyhow::Result;
use clap::Parser;
use runbook::compiler::RunbookCompiler;
use runbook::inventory::InventoryMode;
use runbook::runbook::Runbook;

/// Arguments for the validate command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub compile: CompileArgs,

    /// Print the rendered inventory and playbook
    #[arg(long)]
    pub print: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let runbook = self.compile.load()?;
        let compiler = self.compile.compiler(ctx);
        let artifacts = compiler.compile(&runbook, self.compile.debug_requested(ctx));
        let rendered = artifacts.render()?;

        if ctx.output.is_json() {
            let mut summary = Self::summary(&runbook, &compiler);
            if self.print {
                summary["inventory"] = rendered.inventory.clone().into();
                summary["playbook"] = rendered.playbook.clone().into();
            }
            ctx.output.json(&summary);
            return Ok(0);
        }

        ctx.output.section(&format!("Runbook: {}", runbook.name()));
        if let Some(description) = runbook.description() {
            ctx.output.info(description);
        }
        let hosts: Vec<String> = runbook.hosts().iter().map(|h| h.address.clone()).collect();
        ctx.output.list("Hosts", &hosts);
        let steps: Vec<String> = runbook
            .steps()
            .iter()
            .map(|s| format!("{} ({})", s.name, s.kind.label()))
            .collect();
        ctx.output.list("Steps", &steps);

        if self.print {
            ctx.output.section(&format!("Inventory ({})", compiler.inventory_mode()));
            ctx.output.raw(&rendered.inventory);
            ctx.output.section("Playbook");
            ctx.output.raw(&rendered.playbook);
        }

        if runbook.hosts().iter().any(|h| h.is_localhost())
            && compiler.inventory_mode() == InventoryMode::Uniform
        {
            ctx.output
                .warning("localhost will be reached over SSH in uniform inventory mode");
        }

        ctx.output.valid(runbook.name());
        Ok(0)
    }

    fn summary(runbook: &Runbook, compiler: &RunbookCompiler) -> serde_json::Value {
        let steps: Vec<serde_json::Value> = runbook
            .steps()
            .iter()
            .map(|s| serde_json::json!({ "name": s.name, "kind": s.kind.label() }))
            .collect();

        serde_json::json!({
            "type": "validation",
            "valid": true,
            "runbook": runbook.name(),
            "inventory_mode": compiler.inventory_mode().to_string(),
            "hosts": runbook.hosts().iter().map(|h| h.address.as_str()).collect::<Vec<_>>(),
            "steps": steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use runbook::parser::{parse_runbook, SourceFormat};

    #[tokio::test]
    async fn test_validate_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("deploy.toml");
        std::fs::write(&source, SAMPLE_RUNBOOK).unwrap();
        let out = dir.path().join("generated");

        let args = ValidateArgs {
            compile: compile_args(&source, &out),
            print: false,
        };
        assert_eq!(args.execute(&mut quiet_context()).await.unwrap(), 0);
        assert!(!out.exists());
    }

    #[test]
    fn test_summary_lists_steps() {
        let book = parse_runbook(SAMPLE_RUNBOOK, SourceFormat::Toml, "deploy.toml").unwrap();
        let summary = ValidateArgs::summary(&book, &RunbookCompiler::default());

        assert_eq!(summary["runbook"], "sample");
        assert_eq!(summary["hosts"][1], "10.0.0.5");
        assert_eq!(summary["steps"][0]["kind"], "shell");
        assert_eq!(summary["steps"][1]["kind"], "message");
    }
}
