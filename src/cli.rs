//! CLI definitions for compinstall
//!
//! The completion flags take an optional shell name: `--install-completion`
//! alone detects the invoking shell, `--install-completion zsh` targets an
//! explicit one.

use clap::Parser;

#[derive(Parser)]
#[command(name = "compinstall")]
#[command(about = "Install shell tab-completion for this program")]
#[command(
    long_about = "Install shell tab-completion for this program.

Supports bash, zsh, fish and PowerShell. The completion script is written
to the shell's conventional location and the shell's startup file is
patched (idempotently) so the script is loaded in new sessions.

EXAMPLES:
    compinstall --install-completion          Detect the current shell and install
    compinstall --install-completion zsh      Install for zsh explicitly
    compinstall --show-completion bash        Print the bash script to stdout"
)]
#[command(version)]
pub struct Cli {
    /// Install completion for the given shell (detected when omitted)
    #[arg(long, value_name = "SHELL", num_args = 0..=1)]
    pub install_completion: Option<Option<String>>,

    /// Print the completion script for the given shell (detected when omitted)
    #[arg(long, value_name = "SHELL", num_args = 0..=1)]
    pub show_completion: Option<Option<String>>,
}
