//! Host OS facilities used by builtins
//!
//! `pwd` and `date` are the only commands that reach outside the process.
//! They go through the `Host` trait so the dispatcher can be driven by a fake
//! in tests.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Upper bound on how long the date command may run
pub const DATE_TIMEOUT: Duration = Duration::from_secs(1);

/// Poll period while waiting for a child process
const CHILD_POLL: Duration = Duration::from_millis(5);

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Failed to read working directory: {0}")]
    WorkingDir(#[source] io::Error),

    #[error("Failed to spawn process: {0}")]
    Spawn(#[source] io::Error),

    #[error("Process did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Process exited with {0}")]
    Failed(ExitStatus),

    #[error("Process produced no output")]
    EmptyOutput,
}

pub type Result<T> = std::result::Result<T, HostError>;

/// OS services needed by the command dispatcher
pub trait Host {
    /// Current working directory of the process
    fn working_dir(&self) -> Result<PathBuf>;

    /// Current date and time as a single display line
    fn date(&self) -> Result<String>;
}

/// Real host backed by the running process and the platform date command
#[derive(Debug, Clone)]
pub struct SystemHost {
    date_timeout: Duration,
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemHost {
    pub fn new() -> Self {
        Self {
            date_timeout: DATE_TIMEOUT,
        }
    }

    #[cfg(windows)]
    fn date_command() -> Command {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "date", "/T"]);
        cmd
    }

    #[cfg(not(windows))]
    fn date_command() -> Command {
        Command::new("date")
    }
}

impl Host for SystemHost {
    fn working_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().map_err(HostError::WorkingDir)
    }

    fn date(&self) -> Result<String> {
        let mut cmd = Self::date_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        let output = run_with_timeout(cmd, self.date_timeout)?;
        first_line(&output).ok_or(HostError::EmptyOutput)
    }
}

/// Run a command to completion, killing it if it exceeds `timeout`.
/// Returns its stdout.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<String> {
    let mut child = cmd.spawn().map_err(HostError::Spawn)?;
    let deadline = Instant::now() + timeout;

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(HostError::Timeout(timeout));
                }
                thread::sleep(CHILD_POLL);
            }
            Err(e) => return Err(HostError::Spawn(e)),
        }
    };

    if !status.success() {
        return Err(HostError::Failed(status));
    }

    // The child has exited, so reading its pipe cannot block
    let mut output = String::new();
    if let Some(mut stdout) = child.stdout.take() {
        stdout
            .read_to_string(&mut output)
            .map_err(HostError::Spawn)?;
    }
    Ok(output)
}

/// First line of process output with trailing whitespace removed
fn first_line(output: &str) -> Option<String> {
    let line = output.lines().next()?.trim_end();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(
            first_line("Fri Oct 16 09:00:00 UTC 2026\n"),
            Some("Fri Oct 16 09:00:00 UTC 2026".to_string())
        );
        assert_eq!(first_line("one \r\ntwo\n"), Some("one".to_string()));
        assert_eq!(first_line(""), None);
        assert_eq!(first_line("\n"), None);
    }

    #[test]
    fn test_working_dir_matches_env() {
        let host = SystemHost::new();
        let expected = std::env::current_dir().ok();
        assert_eq!(host.working_dir().ok(), expected);
    }

    #[test]
    fn test_spawn_missing_program() {
        let cmd = Command::new("minterm-no-such-program-for-tests");
        let err = run_with_timeout(cmd, DATE_TIMEOUT).unwrap_err();
        assert!(matches!(err, HostError::Spawn(_)));
    }

    #[test]
    #[cfg(unix)]
    fn test_timeout_kills_child() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5").stdout(Stdio::piped());
        let started = Instant::now();
        let err = run_with_timeout(cmd, Duration::from_millis(50)).unwrap_err();
        assert!(matches!(err, HostError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    #[cfg(unix)]
    fn test_date_produces_line() {
        let host = SystemHost::new();
        if let Ok(line) = host.date() {
            assert!(!line.is_empty());
            assert!(!line.ends_with('\n'));
        }
    }
}
