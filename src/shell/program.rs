//! Identity of the program completion is installed for.

use std::env;

/// The invocable name of the target CLI program.
///
/// The literal name is used wherever the shell has to match the actual
/// command string; a sanitized form is used inside generated identifiers,
/// where characters like `.` or `-` are not allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramName(String);

impl ProgramName {
    pub fn new(name: impl Into<String>) -> Self {
        ProgramName(name.into())
    }

    /// Derive the program name from the current executable's file name.
    ///
    /// Falls back to the crate's binary name if the executable path cannot
    /// be resolved (e.g. the binary was deleted while running).
    pub fn from_current_exe() -> Self {
        let name = env::current_exe()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
        ProgramName(name)
    }

    /// The literal, unsanitized command name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier-safe form: dashes become underscores, every other
    /// character outside `[A-Za-z0-9_]` is dropped. `tutorial001.py`
    /// becomes `tutorial001py`, `my-tool` becomes `my_tool`.
    pub fn sanitized(&self) -> String {
        self.0
            .chars()
            .filter_map(|c| match c {
                '-' => Some('_'),
                c if c.is_ascii_alphanumeric() || c == '_' => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Name of the generated shell completion function.
    pub fn completion_function(&self) -> String {
        format!("_{}_completion", self.sanitized())
    }

    /// Environment variable the generated scripts set to ask the program
    /// for completion candidates.
    pub fn completion_env_var(&self) -> String {
        format!("_{}_COMPLETE", self.sanitized().to_uppercase())
    }
}

impl std::fmt::Display for ProgramName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
