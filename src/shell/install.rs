//! Install orchestration.
//!
//! Sequences detection, script generation, path resolution, the script
//! file write and the startup-file patch, and builds the report shown to
//! the user. Failures abort the run without touching later steps; writes
//! already committed are left in place (a half-installed completion script
//! is harmless and the next run is idempotent).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{SetupError, SetupResult};
use super::kind::ShellKind;
use super::patch;
use super::paths::InstallTarget;
use super::program::ProgramName;
use super::script;
use crate::process::CommandRunner;

/// Outcome of a completed install.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// The shell completion was installed for.
    pub shell: ShellKind,
    /// The completion script file, when the shell uses one.
    pub script_path: Option<PathBuf>,
    /// The startup file that was patched, when the shell uses one.
    pub startup_file: Option<PathBuf>,
}

impl InstallReport {
    /// Human-readable confirmation, ending with the reminder that the
    /// change only affects new shell sessions.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        // Prefer the script file as "the" install location; PowerShell has
        // no script file, only the patched profile.
        let location = self.script_path.as_ref().or(self.startup_file.as_ref());
        if let Some(path) = location {
            lines.push(format!(
                "{} completion installed in {}",
                self.shell,
                path.display()
            ));
        }
        if self.script_path.is_some() {
            if let Some(rc) = &self.startup_file {
                lines.push(format!("Updated {}", rc.display()));
            }
        }
        lines.push("Completion will take effect once you restart the terminal".to_string());
        lines.join("\n")
    }
}

/// Performs completion installs against a home directory.
///
/// The external-process capability is injected so tests never spawn a real
/// PowerShell.
pub struct Installer<'a> {
    runner: &'a dyn CommandRunner,
    home: PathBuf,
}

impl<'a> Installer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, home: impl Into<PathBuf>) -> Self {
        Installer {
            runner,
            home: home.into(),
        }
    }

    /// Install completion for `prog` into `shell`'s configuration.
    pub fn install(&self, shell: ShellKind, prog: &ProgramName) -> SetupResult<InstallReport> {
        let target = InstallTarget::resolve(shell, prog, &self.home);
        debug!(%shell, prog = prog.as_str(), "installing completion");

        // Script file first (bash, zsh, fish); the startup file is only
        // patched once the script it references exists.
        if let Some(script_path) = &target.script_path {
            write_script_file(script_path, &script::completion_script(shell, prog))?;
        }

        match shell {
            ShellKind::Bash => {
                if let (Some(script_path), Some(rc)) = (&target.script_path, &target.startup_file)
                {
                    patch::append_fragment(rc, &format!("source {}", script_path.display()))?;
                }
            }
            ShellKind::Zsh => {
                if let Some(rc) = &target.startup_file {
                    patch::patch_zshrc(rc)?;
                }
            }
            // Fish auto-loads its completions directory, nothing to patch
            ShellKind::Fish => {}
            ShellKind::PowerShell => {
                let body = script::powershell_install_body(prog, self.runner)?;
                if let Some(profile) = &target.startup_file {
                    patch::append_fragment(profile, &body)?;
                }
            }
        }

        Ok(InstallReport {
            shell,
            script_path: target.script_path,
            startup_file: target.startup_file,
        })
    }
}

/// Write a completion script file, creating parent directories on demand.
fn write_script_file(path: &Path, content: &str) -> SetupResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SetupError::UnwritablePath {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| SetupError::UnwritablePath {
        path: path.to_path_buf(),
        source,
    })
}
