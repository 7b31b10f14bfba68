//! External process execution.
//!
//! PowerShell installs need to spawn the real shell and capture its output.
//! That capability sits behind the [`CommandRunner`] trait so tests can
//! substitute a fake and never spawn a real shell.

use std::io;
use std::process::{Command, Output, Stdio};
use std::time::Duration;

/// Runs an external command and captures its output.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, waiting at most `timeout` for it to exit.
    ///
    /// Returns the captured output on completion; a timeout surfaces as an
    /// [`io::ErrorKind::TimedOut`] error.
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> io::Result<Output>;
}

/// [`CommandRunner`] backed by `std::process`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> io::Result<Output> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        wait_with_timeout(&mut child, timeout)
    }
}

/// Wait for a child process with a bounded timeout.
///
/// Uses a simple polling approach since std::process doesn't have native
/// timeout support. On expiry the child is killed and reaped so no zombie
/// is left behind.
fn wait_with_timeout(child: &mut std::process::Child, timeout: Duration) -> io::Result<Output> {
    use std::io::Read;
    use std::thread;
    use std::time::Instant;

    let start = Instant::now();
    let poll_interval = Duration::from_millis(50);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = child
                    .stdout
                    .take()
                    .map(|mut s| {
                        let mut buf = Vec::new();
                        s.read_to_end(&mut buf).ok();
                        buf
                    })
                    .unwrap_or_default();

                let stderr = child
                    .stderr
                    .take()
                    .map(|mut s| {
                        let mut buf = Vec::new();
                        s.read_to_end(&mut buf).ok();
                        buf
                    })
                    .unwrap_or_default();

                return Ok(Output {
                    status,
                    stdout,
                    stderr,
                });
            }
            Ok(None) => {
                if start.elapsed() >= timeout {
                    // Kill and reap to prevent a zombie process
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "Process timed out"));
                }
                thread::sleep(poll_interval);
            }
            Err(e) => return Err(e),
        }
    }
}
