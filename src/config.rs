//! Configuration for the runbook CLI.
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - System configuration (/etc/runbook-cli/config.toml)
//! - User configuration (~/.config/runbook-cli/config.toml)
//! - Project configuration (./.runbook-cli.toml)
//! - Environment variables
//!
//! Command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorContext, Result};
use crate::inventory::InventoryMode;
use crate::output::ArtifactNames;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings
    pub defaults: Defaults,

    /// Inventory generation settings
    pub inventory: InventoryConfig,

    /// Playbook generation settings
    pub playbook: PlaybookConfig,

    /// Engine invocation settings
    pub execution: ExecutionConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Default configuration values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Directory artifacts are written to
    pub output_dir: PathBuf,

    /// Enable debug mode for every runbook
    pub debug: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./generated"),
            debug: false,
        }
    }
}

/// Inventory settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// How `localhost` is rendered
    pub mode: InventoryMode,

    /// Inventory file name inside the output directory
    pub file_name: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            mode: InventoryMode::default(),
            file_name: ArtifactNames::default().inventory,
        }
    }
}

/// Playbook settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybookConfig {
    /// Playbook file name inside the output directory
    pub file_name: String,
}

impl Default for PlaybookConfig {
    fn default() -> Self {
        Self {
            file_name: ArtifactNames::default().playbook,
        }
    }
}

/// Execution engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Engine executable, looked up on PATH
    pub executable: String,

    /// Number of `-v` flags passed in debug mode
    pub debug_verbosity: u8,

    /// Extra arguments appended to every invocation
    pub extra_args: Vec<String>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            executable: "ansible-playbook".to_string(),
            debug_verbosity: 2,
            extra_args: vec![],
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level when no `-v` flag or `RUST_LOG` is given
    pub level: String,

    /// Log format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                config = config.merge_from_file(&path)?;
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Get the list of configuration file paths to check
    fn get_config_paths(explicit_path: Option<&PathBuf>) -> Vec<PathBuf> {
        // Explicit path takes priority
        if let Some(path) = explicit_path {
            return vec![path.clone()];
        }

        let mut paths = vec![PathBuf::from("/etc/runbook-cli/config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("runbook-cli/config.toml"));
        }

        paths.push(PathBuf::from(".runbook-cli.toml"));
        paths
    }

    /// Merge configuration from a file
    fn merge_from_file(&self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let layer = ConfigLayer::parse(&content, path)?;
        Ok(self.merge(layer))
    }

    /// Merge a file layer into this config. Every key the layer sets wins,
    /// including keys set back to their default value.
    fn merge(&self, layer: ConfigLayer) -> Config {
        let mut merged = self.clone();

        if let Some(defaults) = layer.defaults {
            overlay(&mut merged.defaults.output_dir, defaults.output_dir);
            overlay(&mut merged.defaults.debug, defaults.debug);
        }
        if let Some(inventory) = layer.inventory {
            overlay(&mut merged.inventory.mode, inventory.mode);
            overlay(&mut merged.inventory.file_name, inventory.file_name);
        }
        if let Some(playbook) = layer.playbook {
            overlay(&mut merged.playbook.file_name, playbook.file_name);
        }
        if let Some(execution) = layer.execution {
            overlay(&mut merged.execution.executable, execution.executable);
            overlay(&mut merged.execution.debug_verbosity, execution.debug_verbosity);
            overlay(&mut merged.execution.extra_args, execution.extra_args);
        }
        if let Some(logging) = layer.logging {
            overlay(&mut merged.logging.level, logging.level);
            overlay(&mut merged.logging.format, logging.format);
        }

        merged
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("RUNBOOK_OUTPUT_DIR") {
            self.defaults.output_dir = PathBuf::from(dir);
        }

        if let Some(debug) = lookup("RUNBOOK_DEBUG") {
            self.defaults.debug = parse_bool("RUNBOOK_DEBUG", &debug)?;
        }

        if let Some(mode) = lookup("RUNBOOK_INVENTORY_MODE") {
            self.inventory.mode = mode.parse()?;
        }

        if let Some(executable) = lookup("RUNBOOK_ANSIBLE_PLAYBOOK") {
            self.execution.executable = executable;
        }

        if let Some(level) = lookup("RUNBOOK_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("RUNBOOK_LOG_FORMAT") {
            self.logging.format = match format.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                other => {
                    return Err(Error::InvalidConfig {
                        key: "RUNBOOK_LOG_FORMAT".to_string(),
                        message: format!("unknown format '{other}', expected 'text' or 'json'"),
                    })
                }
            };
        }

        Ok(())
    }

    /// File names for the generated artifacts.
    pub fn artifact_names(&self) -> ArtifactNames {
        ArtifactNames {
            inventory: self.inventory.file_name.clone(),
            playbook: self.playbook.file_name.clone(),
        }
    }

    /// Load from a specific file, without environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Config::default().merge_from_file(path.as_ref())
    }
}

/// One configuration file, with only the keys it actually sets.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigLayer {
    defaults: Option<DefaultsLayer>,
    inventory: Option<InventoryLayer>,
    playbook: Option<PlaybookLayer>,
    execution: Option<ExecutionLayer>,
    logging: Option<LoggingLayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DefaultsLayer {
    output_dir: Option<PathBuf>,
    debug: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct InventoryLayer {
    mode: Option<InventoryMode>,
    file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PlaybookLayer {
    file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ExecutionLayer {
    executable: Option<String>,
    debug_verbosity: Option<u8>,
    extra_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingLayer {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl ConfigLayer {
    fn parse(content: &str, path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let context = || format!("Failed to parse config file: {}", path.display());

        match extension {
            "yml" | "yaml" => serde_yaml::from_str::<Option<Self>>(content)
                .map(Option::unwrap_or_default)
                .with_context(context),
            "json" => serde_json::from_str(content).with_context(context),
            _ => toml::from_str(content).with_context(context),
        }
    }
}

fn overlay<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::InvalidConfig {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}
