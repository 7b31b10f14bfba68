//! compinstall library
//!
//! Installs shell tab-completion for a CLI program into the user's shell
//! configuration, across bash, zsh, fish and PowerShell.

pub mod process;
pub mod shell;

pub use process::{CommandRunner, SystemRunner};
pub use shell::{
    completion_script, InstallReport, InstallTarget, Installer, ProgramName, SetupError,
    SetupResult, ShellKind,
};
