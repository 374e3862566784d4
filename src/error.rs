//! Error types for autobuilder operations.
//!
//! This module defines [`AutobuildError`], the error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every variant is fatal: it is propagated to `main`, logged, and the
//!   process exits with a non-zero status
//! - Best-effort steps (lock file updates, restoring one relocated entry,
//!   custom build scripts) log their failures with `tracing::warn!` and never
//!   produce an `AutobuildError`
//! - Use `anyhow::Error` (via `AutobuildError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for autobuilder operations.
#[derive(Debug, Error)]
pub enum AutobuildError {
    /// The `go` command is required but could not be run.
    #[error("Unable to run the go command, is it installed?\nError: {message}")]
    ToolchainUnavailable { message: String },

    /// Text that should contain a Go version did not.
    #[error("Expected a Go version of the form 'go1.2.3'; got '{text}'")]
    InvalidVersion { text: String },

    /// An environment variable holds a value the autobuilder cannot accept.
    #[error("Unexpected value for environment variable {name}: {value}")]
    InvalidEnvironment { name: String, value: String },

    /// The repository URL could not be parsed.
    #[error("Malformed repository URL '{url}'")]
    MalformedRepoUrl { url: String },

    /// The import path cannot be placed under `$GOPATH/src`.
    #[error("Import path '{path}' does not name a directory under the workspace")]
    InvalidImportPath { path: String },

    /// A filesystem step the rest of the run depends on failed.
    #[error("Failed to {action} {path}: {source}")]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The extractor binary could not be located.
    #[error("Could not determine path of extractor: {message}")]
    ExtractorNotFound { message: String },

    /// An external command could not be started or exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AutobuildError {
    /// Wrap an IO error from a filesystem step with the path it touched.
    pub fn filesystem(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for autobuilder operations.
pub type Result<T> = std::result::Result<T, AutobuildError>;
