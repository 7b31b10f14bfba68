//! compinstall - CLI entry point

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use compinstall::shell::{completion_script, Installer, ProgramName, SetupError, ShellKind};
use compinstall::SystemRunner;

mod cli;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let (flag, result) = if let Some(arg) = &cli.install_completion {
        ("--install-completion", cmd_install(arg.as_deref()))
    } else if let Some(arg) = &cli.show_completion {
        ("--show-completion", cmd_show(arg.as_deref()))
    } else {
        let _ = cli::Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // No detectable shell and no explicit argument is a usage
            // error: the flag needs its argument.
            if matches!(
                err.downcast_ref::<SetupError>(),
                Some(SetupError::DetectionFailed)
            ) {
                eprintln!("Error: Option '{flag}' requires an argument");
                ExitCode::from(2)
            } else {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        }
    }
}

/// Install completion for the resolved shell and report where it went.
fn cmd_install(explicit: Option<&str>) -> Result<()> {
    let shell = ShellKind::resolve(explicit)?;
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let prog = ProgramName::from_current_exe();

    let runner = SystemRunner;
    let installer = Installer::new(&runner, home);
    let report = installer.install(shell, &prog)?;

    println!("{}", report.summary());
    Ok(())
}

/// Print the completion script for the resolved shell to stdout.
fn cmd_show(explicit: Option<&str>) -> Result<()> {
    let shell = ShellKind::resolve(explicit)?;
    let prog = ProgramName::from_current_exe();
    print!("{}", completion_script(shell, &prog));
    Ok(())
}
