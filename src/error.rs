//! Error types for the runbook compiler.
//!
//! Errors fall into three families: *source* errors (the runbook text could
//! not be parsed), *structural* errors (it parsed, but a required field is
//! missing or a step has no recognisable shape) and *execution* errors (the
//! configuration-management engine exited non-zero). The remaining variants
//! cover the I/O boundary and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for runbook operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the runbook compiler.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// Error parsing a runbook source file.
    #[error("Failed to parse runbook '{path}': {message}")]
    RunbookParse {
        /// Path to the runbook file
        path: PathBuf,
        /// Error message
        message: String,
        /// Source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// A required runbook field is missing or empty.
    #[error("Runbook validation failed: {0}")]
    RunbookValidation(String),

    /// A step matches none of the message, stdin-command or shell shapes.
    #[error("Step {index} ('{name}') must define either 'msg' or 'command'")]
    InvalidStep {
        /// 1-based position of the step in the runbook
        index: usize,
        /// Step name, or `<unnamed>`
        name: String,
    },

    // ========================================================================
    // Artifact Errors
    // ========================================================================
    /// The playbook document could not be serialized.
    #[error("Failed to render playbook: {0}")]
    PlaybookRender(#[from] serde_yaml::Error),

    /// An artifact could not be written.
    #[error("Failed to write '{path}': {source}")]
    ArtifactWrite {
        /// Target path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// The execution engine binary could not be located.
    #[error("Executable '{0}' not found in PATH")]
    ExecutableNotFound(String),

    /// The execution engine ran but exited unsuccessfully.
    #[error("'{program}' exited with {}", describe_exit(.exit_code))]
    ExecutionFailed {
        /// Program that was run
        program: String,
        /// Exit code, `None` when terminated by a signal
        exit_code: Option<i32>,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Other Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with source.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a new runbook parse error.
    pub fn runbook_parse(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::RunbookParse {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Creates a new structural validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::RunbookValidation(message.into())
    }

    /// Creates a new artifact write error.
    pub fn artifact_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ArtifactWrite {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by a runbook that parsed but is malformed.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::RunbookValidation(_) | Error::InvalidStep { .. })
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::RunbookParse { .. } | Error::RunbookValidation(_) | Error::InvalidStep { .. } => 4,
            Error::ExecutionFailed { exit_code, .. } => match exit_code {
                Some(code) if *code != 0 => *code,
                _ => 2,
            },
            Error::ExecutableNotFound(_) => 127,
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Adds context with a closure that is only evaluated on error.
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Other {
            message: message.into(),
            source: Some(Box::new(e)),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| Error::Other {
            message: f().into(),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_classification() {
        assert!(Error::validation("missing name").is_structural());
        assert!(Error::InvalidStep {
            index: 1,
            name: "bad".into()
        }
        .is_structural());
        assert!(!Error::InvalidConfig {
            key: "inventory.mode".into(),
            message: "x".into()
        }
        .is_structural());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::validation("x").exit_code(), 4);
        assert_eq!(Error::runbook_parse("r.toml", "bad", None).exit_code(), 4);
        assert_eq!(
            Error::ExecutionFailed {
                program: "ansible-playbook".into(),
                exit_code: Some(3),
            }
            .exit_code(),
            3
        );
        assert_eq!(
            Error::ExecutionFailed {
                program: "ansible-playbook".into(),
                exit_code: None,
            }
            .exit_code(),
            2
        );
        assert_eq!(
            Error::InvalidConfig {
                key: "inventory.mode".into(),
                message: "x".into()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_invalid_step_message() {
        let err = Error::InvalidStep {
            index: 2,
            name: "bad".into(),
        };
        assert_eq!(
            err.to_string(),
            "Step 2 ('bad') must define either 'msg' or 'command'"
        );
    }

    #[test]
    fn test_execution_failed_message() {
        let err = Error::ExecutionFailed {
            program: "ansible-playbook".into(),
            exit_code: Some(4),
        };
        assert_eq!(err.to_string(), "'ansible-playbook' exited with status 4");
    }

    #[test]
    fn test_error_context() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = res.context("reading config").unwrap_err();
        assert_eq!(err.to_string(), "reading config");
    }
}
