use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::cancel;

/// Exit status `sh` uses when a command cannot be found.
pub const COMMAND_NOT_FOUND: i32 = 127;

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Errors from running a shell command
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Failed to start command: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Failed to wait for command: {0}")]
    Wait(#[source] std::io::Error),
    #[error("Command interrupted")]
    Cancelled,
}

/// Captured result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Trait for command execution - allows mocking in tests
pub trait CommandRunner {
    /// Run `command` in `dir`, capturing its output and elapsed time.
    fn run(&self, command: &str, dir: &Path) -> Result<CommandOutput, CommandError>;
}

/// Runs commands through `sh -c` with a timeout.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, dir: &Path) -> Result<CommandOutput, CommandError> {
        debug!("Running `{}` in {}", command, dir.display());
        let started = Instant::now();

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so a kill reaches everything the shell started.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        let mut child = cmd.spawn().map_err(CommandError::Spawn)?;

        // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let (exit_code, timed_out) = match wait_with_timeout(&mut child, self.timeout, started) {
            Ok(status) => status,
            Err(e) => {
                kill_tree(&mut child);
                let _ = child.wait();
                return Err(e);
            }
        };

        // Background processes may still hold the pipes; stop waiting at the deadline.
        let grace = (started + self.timeout)
            .saturating_duration_since(Instant::now())
            .max(DRAIN_GRACE);
        let output = CommandOutput {
            exit_code,
            stdout: collect_drain(stdout, grace),
            stderr: collect_drain(stderr, grace),
            duration: started.elapsed(),
            timed_out,
        };
        debug!(
            "`{}` finished in {:.2}s (exit {:?}, timed out: {})",
            command,
            output.duration.as_secs_f64(),
            output.exit_code,
            output.timed_out
        );
        Ok(output)
    }
}

fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    started: Instant,
) -> Result<(Option<i32>, bool), CommandError> {
    loop {
        if let Some(status) = child.try_wait().map_err(CommandError::Wait)? {
            return Ok((status.code(), false));
        }
        if cancel::is_cancelled() {
            return Err(CommandError::Cancelled);
        }
        if started.elapsed() >= timeout {
            kill_tree(child);
            let status = child.wait().map_err(CommandError::Wait)?;
            return Ok((status.code(), true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill the child and every process in its group.
#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    // The child leads its own group, so its pid is the group id.
    match libc::pid_t::try_from(child.id()) {
        // SAFETY: kill(2) with a negative pid only signals that process group.
        Ok(pgid) => unsafe {
            libc::kill(-pgid, libc::SIGKILL);
        },
        Err(_) => {
            let _ = child.kill();
        }
    }
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<String>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
        });
        rx
    })
}

fn collect_drain(rx: Option<Receiver<String>>, grace: Duration) -> String {
    rx.and_then(|rx| rx.recv_timeout(grace).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> ShellRunner {
        ShellRunner::new(Duration::from_secs(10))
    }

    #[test]
    fn captures_stdout_and_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let output = runner().run("echo hello; echo oops >&2", dir.path()).unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[test]
    fn runs_in_the_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "present").unwrap();

        let output = runner().run("cat marker.txt", dir.path()).unwrap();
        assert_eq!(output.stdout, "present");
    }

    #[test]
    fn reports_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let output = runner().run("exit 3", dir.path()).unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, Some(3));
    }

    #[test]
    fn missing_command_exits_127() {
        let dir = tempfile::tempdir().unwrap();
        let output = runner()
            .run("definitely-not-a-real-command-xyz", dir.path())
            .unwrap();
        assert_eq!(output.exit_code, Some(COMMAND_NOT_FOUND));
    }

    #[test]
    fn slow_command_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let output = ShellRunner::new(Duration::from_millis(200))
            .run("exec sleep 5", dir.path())
            .unwrap();

        assert!(output.timed_out);
        assert!(!output.success());
        assert!(output.duration < Duration::from_secs(5));
    }

    #[test]
    fn timeout_kills_processes_started_by_the_shell() {
        let dir = tempfile::tempdir().unwrap();
        let started = Instant::now();
        let output = ShellRunner::new(Duration::from_millis(300))
            .run("sleep 4; echo done", dir.path())
            .unwrap();

        assert!(output.timed_out);
        assert!(!output.stdout.contains("done"));
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "run took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn background_process_does_not_hold_the_run_open() {
        let dir = tempfile::tempdir().unwrap();
        let started = Instant::now();
        let output = ShellRunner::new(Duration::from_secs(1))
            .run("sleep 4 & echo started", dir.path())
            .unwrap();

        assert!(!output.timed_out);
        assert!(output.success());
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
