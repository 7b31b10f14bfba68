//! Unit tests for shell detection

use compinstall::shell::{SetupError, ShellKind, DISABLE_DETECTION_ENV};
use std::env;

use crate::helpers::env_lock;

#[test]
fn detect_uses_shell_env_var() {
    let _guard = env_lock();
    env::remove_var(DISABLE_DETECTION_ENV);
    env::set_var("SHELL", "/usr/bin/zsh");

    assert_eq!(ShellKind::detect().unwrap(), ShellKind::Zsh);

    env::remove_var("SHELL");
}

#[test]
fn detect_recognizes_pwsh_in_shell_var() {
    let _guard = env_lock();
    env::remove_var(DISABLE_DETECTION_ENV);
    env::set_var("SHELL", "/usr/local/bin/pwsh");

    assert_eq!(ShellKind::detect().unwrap(), ShellKind::PowerShell);

    env::remove_var("SHELL");
}

#[test]
fn detection_toggle_forces_failure() {
    let _guard = env_lock();
    env::set_var("SHELL", "/bin/bash");
    env::set_var(DISABLE_DETECTION_ENV, "1");

    let err = ShellKind::detect().unwrap_err();
    assert!(matches!(err, SetupError::DetectionFailed));

    env::remove_var(DISABLE_DETECTION_ENV);
    env::remove_var("SHELL");
}

#[test]
fn resolve_prefers_explicit_shell_over_environment() {
    let _guard = env_lock();
    env::remove_var(DISABLE_DETECTION_ENV);
    env::set_var("SHELL", "/bin/bash");

    assert_eq!(ShellKind::resolve(Some("fish")).unwrap(), ShellKind::Fish);

    env::remove_var("SHELL");
}

#[test]
fn resolve_rejects_explicit_unknown_shell_before_detection() {
    let _guard = env_lock();
    // Even with detection disabled, an explicit name is validated directly
    env::set_var(DISABLE_DETECTION_ENV, "1");

    let err = ShellKind::resolve(Some("ksh")).unwrap_err();
    assert!(matches!(err, SetupError::UnsupportedShell(_)));

    env::remove_var(DISABLE_DETECTION_ENV);
}
