//! Error types for completion installation.
//!
//! Every failure mode is terminal for the current install attempt; nothing
//! is retried. Partial writes committed before a later failure stay on disk
//! (a half-installed completion script is harmless).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for completion setup operations.
pub type SetupResult<T> = Result<T, SetupError>;

/// Errors from shell completion setup.
#[derive(Debug, Error)]
pub enum SetupError {
    /// An explicit shell name was given but is not in the supported set.
    #[error("Shell '{0}' is not supported (expected one of: bash, zsh, fish, powershell)")]
    UnsupportedShell(String),

    /// No shell could be determined from the environment and no explicit
    /// name was supplied.
    #[error("Could not detect the current shell, pass the shell name as an argument")]
    DetectionFailed,

    /// Generating the completion script failed. Only PowerShell can hit
    /// this at install time (spawn failure, timeout, non-zero exit or
    /// empty output from the external shell).
    #[error("Failed to generate completion script: {0}")]
    Generation(String),

    /// A target directory could not be created or a script file could not
    /// be written.
    #[error("Cannot write to {path}: {source}")]
    UnwritablePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The startup file was read successfully but writing the patched
    /// content back failed. The original content is never lost: the write
    /// is staged to a temp file before replacing the target.
    #[error("Failed to update {path}: {source}")]
    PatchFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
