//! Completion script generation.
//!
//! Produces the shell-specific script text that, when sourced, registers a
//! completion function for the target program. The registration commands
//! (`complete -o default -F ..`, `compdef ..`, `complete --command ..`,
//! `Register-ArgumentCompleter ..`) are parsed by real shells and must not
//! be reworded.
//!
//! Bash, zsh and fish scripts are generated from local templates. For a
//! PowerShell install the script body is produced by the actual shell: the
//! installer spawns PowerShell, asks it to run the program in its
//! "show completion script" mode and captures stdout.

use std::env;
use std::time::Duration;

use super::error::{SetupError, SetupResult};
use super::kind::ShellKind;
use super::program::ProgramName;
use crate::process::CommandRunner;

/// Environment toggle marking the process as running under test.
///
/// When set, the PowerShell install path uses the local template instead of
/// spawning a real shell.
pub const TESTING_ENV: &str = "_COMPINSTALL_TESTING";

/// How long to wait for the spawned PowerShell before giving up.
const POWERSHELL_TIMEOUT: Duration = Duration::from_secs(15);

/// Generate the completion script for a shell. Pure; no side effects.
pub fn completion_script(shell: ShellKind, prog: &ProgramName) -> String {
    match shell {
        ShellKind::Bash => bash_script(prog),
        ShellKind::Zsh => zsh_script(prog),
        ShellKind::Fish => fish_script(prog),
        ShellKind::PowerShell => powershell_script(prog),
    }
}

fn bash_script(prog: &ProgramName) -> String {
    let func = prog.completion_function();
    let var = prog.completion_env_var();
    let name = prog.as_str();
    format!(
        r#"{func}() {{
    local IFS=$'\t'
    COMPREPLY=( $( env COMP_WORDS="${{COMP_WORDS[*]}}" \
                   COMP_CWORD=$COMP_CWORD \
                   {var}=complete_bash $1 ) )
    return 0
}}

complete -o default -F {func} {name}
"#
    )
}

fn zsh_script(prog: &ProgramName) -> String {
    let func = prog.completion_function();
    let var = prog.completion_env_var();
    let name = prog.as_str();
    format!(
        r#"#compdef {name}

{func}() {{
    eval $(env {var}_ARGS="${{words[1,$CURRENT]}}" {var}=complete_zsh {name})
}}

compdef {func} {name}
"#
    )
}

fn fish_script(prog: &ProgramName) -> String {
    let func = prog.completion_function();
    let var = prog.completion_env_var();
    let name = prog.as_str();
    format!(
        r#"function {func}
    set -lx {var} complete_fish
    set -lx {var}_ARGS (commandline -cp)
    {name}
end

complete --command {name} --no-files --arguments "({func})"
"#
    )
}

fn powershell_script(prog: &ProgramName) -> String {
    let var = prog.completion_env_var();
    let name = prog.as_str();
    format!(
        r#"Import-Module PSReadLine
Set-PSReadLineKeyHandler -Chord Tab -Function MenuComplete
$scriptblock = {{
    param($wordToComplete, $commandAst, $cursorPosition)
    $Env:{var} = "complete_powershell"
    $Env:{var}_ARGS = $commandAst.ToString()
    $Env:{var}_WORD = $wordToComplete
    {name} | ForEach-Object {{
        $commandArray = $_ -Split ":::"
        $command = $commandArray[0]
        $helpString = $commandArray[1]
        [System.Management.Automation.CompletionResult]::new(
            $command, $command, 'ParameterValue', $helpString)
    }}
    $Env:{var} = ""
    $Env:{var}_ARGS = ""
    $Env:{var}_WORD = ""
}}
Register-ArgumentCompleter -Native -CommandName {name} -ScriptBlock $scriptblock
"#
    )
}

/// Executable used to spawn PowerShell.
fn powershell_executable() -> &'static str {
    if cfg!(windows) {
        "powershell"
    } else {
        "pwsh"
    }
}

/// Produce the script body for a PowerShell install.
///
/// Spawns the platform PowerShell executable, which runs the program in its
/// `--show-completion powershell` mode, and captures stdout as the body.
/// Under [`TESTING_ENV`] the spawn is skipped and the local template is
/// returned directly.
pub fn powershell_install_body(
    prog: &ProgramName,
    runner: &dyn CommandRunner,
) -> SetupResult<String> {
    if env::var_os(TESTING_ENV).is_some() {
        return Ok(powershell_script(prog));
    }

    let shell = powershell_executable();
    let command = format!("{} --show-completion powershell", prog.as_str());
    let output = runner
        .run(
            shell,
            &["-NoProfile", "-Command", &command],
            POWERSHELL_TIMEOUT,
        )
        .map_err(|e| SetupError::Generation(format!("could not run {shell}: {e}")))?;

    if !output.status.success() {
        return Err(SetupError::Generation(format!(
            "{shell} exited with {}",
            output.status
        )));
    }

    let body = decode_console_output(&output.stdout);
    if body.trim().is_empty() {
        return Err(SetupError::Generation(format!(
            "{shell} produced no completion script"
        )));
    }
    Ok(body)
}

/// Decode console output using the likely native encoding.
///
/// PowerShell on Windows emits the ANSI codepage, not UTF-8. Valid UTF-8 is
/// taken as-is; anything else is decoded as Windows-1252.
fn decode_console_output(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
    }
}

/// Windows-1252 maps bytes to Unicode like Latin-1 except for 0x80..=0x9F.
fn windows_1252_char(byte: u8) -> char {
    const C1_REPLACEMENTS: [char; 32] = [
        '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}',
        '\u{2021}', '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}',
        '\u{017D}', '\u{008F}', '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
        '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
        '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
    ];
    match byte {
        0x80..=0x9F => C1_REPLACEMENTS[(byte - 0x80) as usize],
        b => b as char,
    }
}
