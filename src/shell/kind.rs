//! Shell identification.
//!
//! Resolves which shell the completion should be installed for: either an
//! explicit name passed on the command line, or runtime detection from the
//! environment and the parent process chain.

use std::env;
use std::path::Path;

use super::error::{SetupError, SetupResult};

/// Environment toggle that disables live shell detection.
///
/// When set, `ShellKind::detect` always fails, so tests can exercise the
/// "no shell detected" error path regardless of the invoking shell.
pub const DISABLE_DETECTION_ENV: &str = "_COMPINSTALL_DISABLE_SHELL_DETECTION";

/// Supported shell families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl ShellKind {
    /// All supported shells, in the order they are listed to the user.
    pub const ALL: [ShellKind; 4] = [
        ShellKind::Bash,
        ShellKind::Zsh,
        ShellKind::Fish,
        ShellKind::PowerShell,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            ShellKind::Bash => "bash",
            ShellKind::Zsh => "zsh",
            ShellKind::Fish => "fish",
            ShellKind::PowerShell => "powershell",
        }
    }

    /// Parse an explicit shell name (case-insensitive).
    ///
    /// Accepts `pwsh` as an alias for `powershell`, matching the executable
    /// name of PowerShell Core.
    pub fn from_name(name: &str) -> SetupResult<ShellKind> {
        match name.to_lowercase().as_str() {
            "bash" => Ok(ShellKind::Bash),
            "zsh" => Ok(ShellKind::Zsh),
            "fish" => Ok(ShellKind::Fish),
            "pwsh" | "powershell" => Ok(ShellKind::PowerShell),
            _ => Err(SetupError::UnsupportedShell(name.to_string())),
        }
    }

    /// Resolve the target shell for an install run.
    ///
    /// An explicit override is validated against the supported set and used
    /// directly; otherwise the invoking shell is detected.
    pub fn resolve(explicit: Option<&str>) -> SetupResult<ShellKind> {
        match explicit {
            Some(name) => ShellKind::from_name(name),
            None => ShellKind::detect(),
        }
    }

    /// Detect the invoking shell from the environment.
    ///
    /// Checks `$SHELL` first, then (on Unix) the parent process name, then
    /// (on Windows) `PSModulePath` as a PowerShell hint.
    pub fn detect() -> SetupResult<ShellKind> {
        if env::var_os(DISABLE_DETECTION_ENV).is_some() {
            return Err(SetupError::DetectionFailed);
        }

        if let Ok(shell_path) = env::var("SHELL") {
            if let Some(kind) = classify_executable(&shell_path) {
                return Ok(kind);
            }
        }

        #[cfg(unix)]
        if let Some(name) = parent_process_name() {
            if let Some(kind) = classify_executable(&name) {
                return Ok(kind);
            }
        }

        #[cfg(windows)]
        if env::var_os("PSModulePath").is_some() {
            return Ok(ShellKind::PowerShell);
        }

        Err(SetupError::DetectionFailed)
    }
}

impl std::fmt::Display for ShellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Map an executable path or name to a shell kind.
///
/// Matches on the file name so `/usr/local/bin/fish` and `fish` both work.
/// Login-shell convention prefixes the name with `-`, so that is stripped.
fn classify_executable(path: &str) -> Option<ShellKind> {
    let name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);
    let name = name.trim_start_matches('-').to_lowercase();

    if name.contains("pwsh") || name.contains("powershell") {
        Some(ShellKind::PowerShell)
    } else if name.contains("bash") {
        Some(ShellKind::Bash)
    } else if name.contains("zsh") {
        Some(ShellKind::Zsh)
    } else if name.contains("fish") {
        Some(ShellKind::Fish)
    } else {
        None
    }
}

/// Name of the parent process, read via `ps` (read-only inspection).
#[cfg(unix)]
fn parent_process_name() -> Option<String> {
    use std::process::Command;

    let ppid = std::os::unix::process::parent_id();
    let output = Command::new("ps")
        .args(["-o", "comm=", "-p", &ppid.to_string()])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
