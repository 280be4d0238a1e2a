//! Runbook compilation.
//!
//! [`RunbookCompiler`] turns a validated [`Runbook`] into the inventory and
//! playbook documents. It performs no I/O; writing the artifacts and
//! running the engine happen in [`crate::output`] and [`crate::executor`].

use tracing::info;

use crate::error::Result;
use crate::inventory::{InventoryDocument, InventoryGenerator, InventoryMode};
use crate::playbook::{PlaybookDocument, PlaybookGenerator};
use crate::runbook::Runbook;

/// Both generated documents.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledArtifacts {
    pub inventory: InventoryDocument,
    pub playbook: PlaybookDocument,
    /// Debug flag the artifacts were generated with
    pub debug: bool,
}

/// Both documents rendered to text, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    pub inventory: String,
    pub playbook: String,
}

impl CompiledArtifacts {
    /// Renders both documents. Fails only if YAML serialization fails.
    pub fn render(&self) -> Result<RenderedArtifacts> {
        Ok(RenderedArtifacts {
            inventory: self.inventory.render(),
            playbook: self.playbook.to_yaml()?,
        })
    }
}

/// Compiles runbooks into inventory and playbook documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunbookCompiler {
    inventory: InventoryGenerator,
    playbook: PlaybookGenerator,
}

impl RunbookCompiler {
    pub fn new(mode: InventoryMode) -> Self {
        Self {
            inventory: InventoryGenerator::new(mode),
            playbook: PlaybookGenerator::new(),
        }
    }

    pub fn inventory_mode(&self) -> InventoryMode {
        self.inventory.mode()
    }

    /// Compiles a runbook. `debug` is combined with the runbook's own
    /// default.
    pub fn compile(&self, runbook: &Runbook, debug: bool) -> CompiledArtifacts {
        let debug_enabled = runbook.effective_debug(debug);
        let inventory = self
            .inventory
            .generate(runbook.hosts(), runbook.environment());
        let playbook = self.playbook.generate(runbook, debug_enabled);

        info!(
            runbook = runbook.name(),
            hosts = inventory.hosts().len(),
            tasks = playbook.tasks().len(),
            debug = debug_enabled,
            mode = %self.inventory.mode(),
            "compiled runbook"
        );

        CompiledArtifacts {
            inventory,
            playbook,
            debug: debug_enabled,
        }
    }
}
