//! Runbook source parsing.
//!
//! Turns runbook source text into [`RawRunbook`] records and then into a
//! validated [`Runbook`]. TOML is the native format; YAML and JSON are
//! accepted by file extension.

use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::error::{Error, Result};
use crate::runbook::{RawRunbook, Runbook};

/// Errors from the underlying structured-config parsers.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML syntax error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Toml,
    Yaml,
    Json,
    /// Unknown extension: TOML first, then YAML
    Auto,
}

impl SourceFormat {
    /// Picks a format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            Some("yml" | "yaml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Auto,
        }
    }
}

/// Parses source text into raw records without validating them.
pub fn parse_raw(content: &str, format: SourceFormat) -> std::result::Result<RawRunbook, ParseError> {
    let raw = match format {
        SourceFormat::Toml => toml::from_str(content)?,
        SourceFormat::Yaml => serde_yaml::from_str(content)?,
        SourceFormat::Json => serde_json::from_str(content)?,
        SourceFormat::Auto => match toml::from_str(content) {
            Ok(raw) => raw,
            Err(toml_err) => serde_yaml::from_str(content).map_err(|yaml_err| {
                debug!(%yaml_err, "YAML fallback failed");
                ParseError::Toml(toml_err)
            })?,
        },
    };
    Ok(raw)
}

/// Parses and validates runbook source text.
///
/// `origin` only labels errors; use `"<string>"` for in-memory sources.
pub fn parse_runbook(content: &str, format: SourceFormat, origin: impl AsRef<Path>) -> Result<Runbook> {
    let origin = origin.as_ref();
    let raw = parse_raw(content, format).map_err(|e| {
        Error::runbook_parse(origin, e.to_string(), Some(Box::new(e)))
    })?;
    Runbook::from_raw(raw)
}

/// Reads, parses and validates a runbook file.
pub fn load_runbook(path: impl AsRef<Path>) -> Result<Runbook> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::runbook_parse(path, format!("Failed to read file: {}", e), Some(Box::new(e)))
    })?;

    let format = SourceFormat::from_path(path);
    debug!(path = %path.display(), ?format, "parsing runbook");
    parse_runbook(&content, format, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runbook::StepKind;
    use std::path::PathBuf;

    const TOML_RUNBOOK: &str = r#"
name = "deploy"
description = "Deploy the app"
debug = true

[env]
user = "root"
python = "/usr/bin/python3"
become = true

[[hosts]]
addr = "10.0.0.5"

[[hosts]]
addr = "10.0.0.6"
[hosts.env]
user = "deploy"

[[steps]]
name = "greet"
msg = "hello"

[[steps]]
name = "load"
command = "psql app"
stdin = "select 1;"
become = false

[[steps]]
name = "ping"
command = "echo pong"
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(SourceFormat::from_path(Path::new("a.toml")), SourceFormat::Toml);
        assert_eq!(SourceFormat::from_path(Path::new("a.yml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("a.yaml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("a.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("runbook")), SourceFormat::Auto);
    }

    #[test]
    fn test_parse_toml_runbook() {
        let runbook = parse_runbook(TOML_RUNBOOK, SourceFormat::Toml, "<string>").unwrap();
        assert_eq!(runbook.name(), "deploy");
        assert_eq!(runbook.description(), Some("Deploy the app"));
        assert!(runbook.debug_default());
        assert_eq!(runbook.hosts().len(), 2);
        assert_eq!(
            runbook.hosts()[1]
                .environment_override
                .as_ref()
                .and_then(|e| e.user.as_deref()),
            Some("deploy")
        );

        let kinds: Vec<_> = runbook.steps().iter().map(|s| s.kind.label()).collect();
        assert_eq!(kinds, vec!["message", "stdin-command", "shell"]);
        assert!(matches!(
            runbook.steps()[1].kind,
            StepKind::StdinCommand {
                become_override: Some(false),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_yaml_runbook() {
        let yaml = r#"
name: yaml-book
env:
  become: false
hosts:
  - addr: localhost
steps:
  - name: hi
    message: hello
"#;
        let runbook = parse_runbook(yaml, SourceFormat::Yaml, "<string>").unwrap();
        assert_eq!(runbook.name(), "yaml-book");
        assert_eq!(runbook.environment().r#become, Some(false));
    }

    #[test]
    fn test_auto_falls_back_to_yaml() {
        let yaml = "name: auto\nhosts:\n  - addr: localhost\nsteps:\n  - name: a\n    command: 'true'\n";
        let runbook = parse_runbook(yaml, SourceFormat::Auto, "<string>").unwrap();
        assert_eq!(runbook.name(), "auto");
    }

    #[test]
    fn test_syntax_error_is_source_error() {
        let err = parse_runbook("name = ", SourceFormat::Toml, "broken.toml").unwrap_err();
        match err {
            Error::RunbookParse { path, .. } => assert_eq!(path, PathBuf::from("broken.toml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let err = load_runbook("/nonexistent/runbook.toml").unwrap_err();
        assert!(matches!(err, Error::RunbookParse { .. }));
        assert_eq!(err.exit_code(), 4);
    }
}
