//! Install target resolution.
//!
//! Maps (shell, program name) to the filesystem locations the completion
//! script and startup-file patch must land in. Pure over the shell, the
//! program name and the user's home directory.

use std::path::{Path, PathBuf};

use super::kind::ShellKind;
use super::program::ProgramName;

/// Resolved install locations for one shell.
///
/// Bash and zsh write a separate script file and patch a startup file.
/// Fish only writes a script file (the completions directory is
/// auto-loaded). PowerShell only patches its profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// Where the completion script file goes, if this shell uses one.
    pub script_path: Option<PathBuf>,
    /// Which startup file gets patched, if any.
    pub startup_file: Option<PathBuf>,
}

impl InstallTarget {
    /// Resolve the install target against an explicit home directory.
    pub fn resolve(shell: ShellKind, prog: &ProgramName, home: &Path) -> InstallTarget {
        match shell {
            ShellKind::Bash => InstallTarget {
                script_path: Some(
                    home.join(".bash_completions")
                        .join(format!("{}.sh", prog.as_str())),
                ),
                startup_file: Some(home.join(".bashrc")),
            },
            ShellKind::Zsh => InstallTarget {
                script_path: Some(home.join(".zfunc").join(format!("_{}", prog.as_str()))),
                startup_file: Some(home.join(".zshrc")),
            },
            ShellKind::Fish => InstallTarget {
                script_path: Some(
                    home.join(".config")
                        .join("fish")
                        .join("completions")
                        .join(format!("{}.fish", prog.as_str())),
                ),
                startup_file: None,
            },
            ShellKind::PowerShell => InstallTarget {
                script_path: None,
                startup_file: Some(powershell_profile(home)),
            },
        }
    }
}

/// Path of the active PowerShell profile file.
#[cfg(not(windows))]
fn powershell_profile(home: &Path) -> PathBuf {
    home.join(".config")
        .join("powershell")
        .join("Microsoft.PowerShell_profile.ps1")
}

#[cfg(windows)]
fn powershell_profile(home: &Path) -> PathBuf {
    home.join("Documents")
        .join("PowerShell")
        .join("Microsoft.PowerShell_profile.ps1")
}
