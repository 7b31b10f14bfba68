//! Unit tests for install orchestration
//!
//! All installs run against a temp home directory; the external-process
//! boundary is a fake runner, so no real shell is ever spawned.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Output;
use std::sync::Mutex;
use std::time::Duration;

use compinstall::process::CommandRunner;
use compinstall::shell::{Installer, ProgramName, SetupError, ShellKind};
use tempfile::TempDir;

/// Runner that records calls and returns a canned result.
struct FakeRunner {
    stdout: Vec<u8>,
    exit_code: i32,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    fn returning(stdout: &[u8], exit_code: i32) -> Self {
        FakeRunner {
            stdout: stdout.to_vec(),
            exit_code,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[cfg(unix)]
impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str], _timeout: Duration) -> io::Result<Output> {
        use std::os::unix::process::ExitStatusExt;

        self.calls.lock().unwrap().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        Ok(Output {
            status: std::process::ExitStatus::from_raw(self.exit_code << 8),
            stdout: self.stdout.clone(),
            stderr: Vec::new(),
        })
    }
}

/// Runner whose spawn always fails.
struct BrokenRunner;

impl CommandRunner for BrokenRunner {
    fn run(&self, _program: &str, _args: &[&str], _timeout: Duration) -> io::Result<Output> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no such executable"))
    }
}

fn prog() -> ProgramName {
    ProgramName::new("tutorial001.py")
}

#[test]
fn bash_install_writes_script_and_patches_bashrc() {
    let home = TempDir::new().unwrap();
    let runner = BrokenRunner;
    let installer = Installer::new(&runner, home.path());

    let report = installer.install(ShellKind::Bash, &prog()).unwrap();

    let script_path = home.path().join(".bash_completions/tutorial001.py.sh");
    assert_eq!(report.script_path.as_deref(), Some(script_path.as_path()));

    let script = fs::read_to_string(&script_path).unwrap();
    assert!(script.contains("complete -o default -F _tutorial001py_completion tutorial001.py"));

    let bashrc = fs::read_to_string(home.path().join(".bashrc")).unwrap();
    assert!(bashrc.contains(&format!("source {}", script_path.display())));
}

#[test]
fn bash_install_preserves_existing_bashrc_content() {
    let home = TempDir::new().unwrap();
    let bashrc_path = home.path().join(".bashrc");
    fs::write(&bashrc_path, "export HISTSIZE=1000\nalias ll='ls -l'\n").unwrap();

    let runner = BrokenRunner;
    Installer::new(&runner, home.path())
        .install(ShellKind::Bash, &prog())
        .unwrap();

    let bashrc = fs::read_to_string(&bashrc_path).unwrap();
    assert!(bashrc.starts_with("export HISTSIZE=1000\nalias ll='ls -l'\n"));
    assert!(bashrc.contains("source "));
}

#[test]
fn bash_install_twice_is_idempotent() {
    let home = TempDir::new().unwrap();
    let runner = BrokenRunner;
    let installer = Installer::new(&runner, home.path());

    installer.install(ShellKind::Bash, &prog()).unwrap();
    let after_first = fs::read_to_string(home.path().join(".bashrc")).unwrap();
    installer.install(ShellKind::Bash, &prog()).unwrap();
    let after_second = fs::read_to_string(home.path().join(".bashrc")).unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(after_second.matches("source ").count(), 1);
}

#[test]
fn zsh_install_writes_zfunc_file_and_fpath_line() {
    let home = TempDir::new().unwrap();
    let runner = BrokenRunner;
    Installer::new(&runner, home.path())
        .install(ShellKind::Zsh, &prog())
        .unwrap();

    let zfunc = fs::read_to_string(home.path().join(".zfunc/_tutorial001.py")).unwrap();
    assert!(zfunc.contains("compdef _tutorial001py_completion tutorial001.py"));

    let zshrc = fs::read_to_string(home.path().join(".zshrc")).unwrap();
    assert!(zshrc.lines().any(|l| l.trim() == "fpath+=~/.zfunc"));
}

#[test]
fn fish_install_writes_completion_file_only() {
    let home = TempDir::new().unwrap();
    let runner = BrokenRunner;
    let report = Installer::new(&runner, home.path())
        .install(ShellKind::Fish, &prog())
        .unwrap();

    let fish_file = home
        .path()
        .join(".config/fish/completions/tutorial001.py.fish");
    let content = fs::read_to_string(&fish_file).unwrap();
    assert!(content.contains("complete --command tutorial001.py"));

    // Fish auto-loads the completions directory; nothing else is touched
    assert!(report.startup_file.is_none());
    assert!(!home.path().join(".bashrc").exists());
}

#[cfg(unix)]
#[test]
fn non_powershell_installs_never_spawn_processes() {
    let home = TempDir::new().unwrap();
    let runner = FakeRunner::returning(b"", 0);
    let installer = Installer::new(&runner, home.path());

    installer.install(ShellKind::Bash, &prog()).unwrap();
    installer.install(ShellKind::Zsh, &prog()).unwrap();
    installer.install(ShellKind::Fish, &prog()).unwrap();

    assert_eq!(runner.call_count(), 0);
}

#[cfg(unix)]
#[test]
fn powershell_install_appends_spawned_script_to_profile() {
    let home = TempDir::new().unwrap();
    let profile_path = home
        .path()
        .join(".config/powershell/Microsoft.PowerShell_profile.ps1");
    fs::create_dir_all(profile_path.parent().unwrap()).unwrap();
    fs::write(&profile_path, "# my profile\n").unwrap();

    let body =
        "Register-ArgumentCompleter -Native -CommandName tutorial001.py -ScriptBlock $scriptblock";
    let runner = FakeRunner::returning(body.as_bytes(), 0);
    let report = Installer::new(&runner, home.path())
        .install(ShellKind::PowerShell, &prog())
        .unwrap();

    assert_eq!(report.startup_file, Some(profile_path.clone()));
    assert!(report.script_path.is_none());

    let profile = fs::read_to_string(&profile_path).unwrap();
    assert!(profile.starts_with("# my profile\n"));
    assert!(profile.contains(body));
}

#[cfg(unix)]
#[test]
fn powershell_install_asks_shell_to_show_completion() {
    let home = TempDir::new().unwrap();
    let runner = FakeRunner::returning(b"some script", 0);
    Installer::new(&runner, home.path())
        .install(ShellKind::PowerShell, &prog())
        .unwrap();

    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (program, args) = &calls[0];
    assert_eq!(program, "pwsh");
    assert_eq!(args[0], "-NoProfile");
    assert_eq!(args[1], "-Command");
    assert!(args[2].contains("--show-completion powershell"));
}

#[cfg(unix)]
#[test]
fn powershell_install_twice_is_idempotent() {
    let home = TempDir::new().unwrap();
    let body = "Register-ArgumentCompleter -Native -CommandName tutorial001.py -ScriptBlock $scriptblock";
    let runner = FakeRunner::returning(body.as_bytes(), 0);
    let installer = Installer::new(&runner, home.path());

    installer.install(ShellKind::PowerShell, &prog()).unwrap();
    installer.install(ShellKind::PowerShell, &prog()).unwrap();

    let profile = fs::read_to_string(
        home.path()
            .join(".config/powershell/Microsoft.PowerShell_profile.ps1"),
    )
    .unwrap();
    assert_eq!(profile.matches("Register-ArgumentCompleter").count(), 1);
}

#[cfg(unix)]
#[test]
fn powershell_install_fails_on_nonzero_exit() {
    let home = TempDir::new().unwrap();
    let runner = FakeRunner::returning(b"partial output", 1);
    let err = Installer::new(&runner, home.path())
        .install(ShellKind::PowerShell, &prog())
        .unwrap_err();

    assert!(matches!(err, SetupError::Generation(_)));
}

#[cfg(unix)]
#[test]
fn powershell_install_fails_on_empty_output() {
    let home = TempDir::new().unwrap();
    let runner = FakeRunner::returning(b"  \n", 0);
    let err = Installer::new(&runner, home.path())
        .install(ShellKind::PowerShell, &prog())
        .unwrap_err();

    assert!(matches!(err, SetupError::Generation(_)));
}

#[test]
fn powershell_install_fails_on_spawn_error() {
    let home = TempDir::new().unwrap();
    let runner = BrokenRunner;
    let err = Installer::new(&runner, home.path())
        .install(ShellKind::PowerShell, &prog())
        .unwrap_err();

    assert!(matches!(err, SetupError::Generation(_)));
    assert!(err.to_string().contains("Failed to generate"));
}

#[test]
fn report_summary_mentions_restart() {
    let home = TempDir::new().unwrap();
    let runner = BrokenRunner;
    let report = Installer::new(&runner, home.path())
        .install(ShellKind::Bash, &prog())
        .unwrap();

    let summary = report.summary();
    assert!(summary.contains("completion installed in"));
    assert!(summary.contains("Completion will take effect once you restart the terminal"));
}

#[test]
fn failed_powershell_generation_leaves_profile_untouched() {
    let home = TempDir::new().unwrap();
    let profile_path = home
        .path()
        .join(".config/powershell/Microsoft.PowerShell_profile.ps1");
    fs::create_dir_all(profile_path.parent().unwrap()).unwrap();
    fs::write(&profile_path, "# untouched\n").unwrap();

    let runner = BrokenRunner;
    let _ = Installer::new(&runner, home.path())
        .install(ShellKind::PowerShell, &prog())
        .unwrap_err();

    assert_eq!(fs::read_to_string(&profile_path).unwrap(), "# untouched\n");
}

#[test]
fn paths_stay_inside_the_given_home() {
    let home = TempDir::new().unwrap();
    let runner = BrokenRunner;
    let report = Installer::new(&runner, home.path())
        .install(ShellKind::Bash, &prog())
        .unwrap();

    let script: PathBuf = report.script_path.unwrap();
    assert!(script.starts_with(home.path()));
}
