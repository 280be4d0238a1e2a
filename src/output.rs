//! Artifact writing.
//!
//! Both documents are rendered in memory before anything touches the
//! filesystem. Both are then written to temporary siblings, and only once
//! both temporaries are complete are they renamed over their targets, back
//! to back. A failed write never leaves a truncated file behind. The two
//! renames are not a single atomic step: if the second rename fails, the
//! new inventory sits next to the previous playbook.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::compiler::CompiledArtifacts;
use crate::error::{Error, Result};

/// File names used inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNames {
    pub inventory: String,
    pub playbook: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            inventory: "hosts".to_string(),
            playbook: "playbook.yml".to_string(),
        }
    }
}

/// Where the artifacts ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenArtifacts {
    pub output_dir: PathBuf,
    pub inventory_path: PathBuf,
    pub playbook_path: PathBuf,
}

/// Renders and writes both artifacts into `output_dir`, creating it if
/// needed.
pub fn write_artifacts(
    artifacts: &CompiledArtifacts,
    output_dir: &Path,
    names: &ArtifactNames,
) -> Result<WrittenArtifacts> {
    let rendered = artifacts.render()?;

    std::fs::create_dir_all(output_dir).map_err(|e| Error::artifact_write(output_dir, e))?;

    let inventory_path = output_dir.join(&names.inventory);
    let playbook_path = output_dir.join(&names.playbook);

    let inventory_tmp = write_temp(&inventory_path, &rendered.inventory)?;
    let playbook_tmp = write_temp(&playbook_path, &rendered.playbook)?;

    persist(inventory_tmp, &inventory_path)?;
    persist(playbook_tmp, &playbook_path)?;

    info!(dir = %output_dir.display(), "generated inventory and playbook");

    Ok(WrittenArtifacts {
        output_dir: output_dir.to_path_buf(),
        inventory_path,
        playbook_path,
    })
}

/// Writes `contents` to a temporary file next to `path`.
fn write_temp(path: &Path, contents: &str) -> Result<NamedTempFile> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::artifact_write(path, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| Error::artifact_write(path, e))?;
    Ok(tmp)
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path)
        .map_err(|e| Error::artifact_write(path, e.error))?;
    Ok(())
}
