//! Shell completion installation.
//!
//! This module handles detecting the invoking shell, generating the
//! shell-specific completion script, resolving where it belongs on disk
//! and idempotently wiring it into the shell's startup file.

pub mod error;
pub mod install;
pub mod kind;
pub mod patch;
pub mod paths;
pub mod program;
pub mod script;

pub use error::{SetupError, SetupResult};
pub use install::{InstallReport, Installer};
pub use kind::{ShellKind, DISABLE_DETECTION_ENV};
pub use paths::InstallTarget;
pub use program::ProgramName;
pub use script::{completion_script, TESTING_ENV};
