//! Idempotent startup-file patching.
//!
//! Startup files (`.bashrc`, `.zshrc`, PowerShell profiles) are foreign,
//! user-owned content. Patching never parses or rewrites what is there: it
//! only appends a fragment that can be detected on the next run, so running
//! install twice changes nothing. Writes are staged to a temp file in the
//! same directory and moved over the target, so a crash mid-write cannot
//! truncate the file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::error::{SetupError, SetupResult};

/// Line that puts `~/.zfunc` on the zsh function search path.
pub const ZSH_FPATH_LINE: &str = "fpath+=~/.zfunc";

/// Block appended to `.zshrc` when the file does not already initialize
/// completion itself.
pub const ZSH_INIT_BLOCK: &str = "autoload -Uz compinit\nfpath+=~/.zfunc\ncompinit";

/// Append `fragment` to the file at `path` unless it is already present.
///
/// The file is created (with parent directories) if absent. All existing
/// bytes are preserved; the fragment is preceded by a newline when the file
/// is non-empty and does not end in one, and is always newline-terminated.
pub fn append_fragment(path: &Path, fragment: &str) -> SetupResult<()> {
    let content = read_or_empty(path)?;

    if content.contains(fragment) {
        debug!(path = %path.display(), "fragment already present, skipping");
        return Ok(());
    }

    let new_content = appended(&content, fragment);
    write_atomic(path, &new_content).map_err(|source| SetupError::PatchFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Wire `~/.zfunc` into `.zshrc`.
///
/// Idempotence is a structural check: the file counts as patched iff some
/// line trims to exactly [`ZSH_FPATH_LINE`], so a commented-out copy or a
/// similar-looking fragment does not match. If the user's file already
/// calls `compinit`, only the fpath line is inserted, immediately before
/// the first such call (it has to be on the path before compinit runs);
/// otherwise the full autoload/fpath/compinit block is appended.
pub fn patch_zshrc(path: &Path) -> SetupResult<()> {
    let content = read_or_empty(path)?;

    if content.lines().any(|l| l.trim() == ZSH_FPATH_LINE) {
        debug!(path = %path.display(), "fpath line already present, skipping");
        return Ok(());
    }

    let new_content = match compinit_offset(&content) {
        Some(offset) => {
            let mut patched = String::with_capacity(content.len() + ZSH_FPATH_LINE.len() + 1);
            patched.push_str(&content[..offset]);
            patched.push_str(ZSH_FPATH_LINE);
            patched.push('\n');
            patched.push_str(&content[offset..]);
            patched
        }
        None => appended(&content, ZSH_INIT_BLOCK),
    };

    write_atomic(path, &new_content).map_err(|source| SetupError::PatchFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Byte offset of the first uncommented line invoking `compinit`.
fn compinit_offset(content: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if !trimmed.starts_with('#') && trimmed.contains("compinit") {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn read_or_empty(path: &Path) -> SetupResult<String> {
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path).map_err(|source| SetupError::PatchFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn appended(content: &str, fragment: &str) -> String {
    if content.is_empty() {
        format!("{fragment}\n")
    } else if content.ends_with('\n') {
        format!("{content}{fragment}\n")
    } else {
        format!("{content}\n{fragment}\n")
    }
}

/// Stage the content to a temp file next to the target, then replace it.
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir)?;
    }
    let mut tmp = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
