//! Error types for the agent linter.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.
//! Schema violations are data, not errors; they never appear here.

use std::path::PathBuf;

use thiserror::Error;

/// Process exit codes of the `agent-lint` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// No violations, or violations in warn-only mode.
    Clean = 0,
    /// Violations found and warn-only mode is off.
    Violations = 1,
    /// Usage or internal error.
    Error = 2,
    /// Interrupted by the user (Ctrl-C).
    Interrupted = 130,
}

impl ExitStatus {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status.code())
    }
}

/// Error types for lint runs.
///
/// Each variant represents a failure that aborts the whole scan.
#[derive(Error, Debug)]
pub enum LintError {
    /// Reading or writing a document failed.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// Document path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid UTF-8.
    #[error("UTF-8 decoding error: {}", .0.display())]
    Encoding(PathBuf),

    /// Frontmatter could not be serialized back to YAML.
    #[error("YAML render error: {0}")]
    Render(#[from] serde_yaml::Error),

    /// An explicitly requested settings file could not be read.
    #[error("Cannot read settings file {}: {source}", .path.display())]
    SettingsRead {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An explicitly requested settings file could not be parsed.
    #[error("Invalid settings file {}: {message}", .path.display())]
    Settings {
        /// Settings file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The roots/schema combination matched no documents.
    #[error("{0}")]
    NothingClassified(String),
}

impl LintError {
    /// Build an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the caller's arguments rather than the environment.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::NothingClassified(_) | Self::Settings { .. } | Self::SettingsRead { .. }
        )
    }
}

/// Result alias for lint operations.
pub type Result<T> = std::result::Result<T, LintError>;
