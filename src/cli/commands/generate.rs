//! Generate command - Compile a runbook into artifacts
//!
//! Writes the inventory and playbook and stops there.

use super::{CommandContext, CompileArgs};
use anyhow::Result;
use clap::Parser;

/// Arguments for the generate command
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub compile: CompileArgs,
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let (artifacts, written) = self.compile.compile_and_write(ctx)?;

        ctx.output
            .info(&format!("Inventory: {}", written.inventory_path.display()));
        ctx.output
            .info(&format!("Playbook: {}", written.playbook_path.display()));
        ctx.output.generated(&written, artifacts.debug);
        ctx.output.hint(&format!(
            "Run it with: ansible-playbook -i {} {}",
            written.inventory_path.display(),
            written.playbook_path.display()
        ));

        Ok(0)
    }
}
