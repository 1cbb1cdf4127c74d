//! Child process helpers for the external detection scripts.
//!
//! Detached children are reaped by a background thread, so launching one
//! from a long-running process leaves no zombie behind.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a finished child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

enum Pipe {
    Stdout,
    Stderr,
}

/// Run `cmd` to completion, capturing both output streams.
///
/// `timeout` bounds the whole call: waiting for the child to exit and
/// collecting its output. A grandchild that inherited the pipes can hold
/// them open after the child exits; the deadline still applies then.
pub fn run_with_timeout(
    mut cmd: Command,
    program: &str,
    timeout: Duration,
) -> AppResult<ProcessOutput> {
    debug!(?cmd, "spawning child process");
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AppError::EngineLaunch {
            program: program.to_string(),
            source: e,
        })?;

    // Pipes are drained on their own threads so a chatty child cannot block
    // on a full pipe while we wait.
    let (tx, rx) = mpsc::channel();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_tx = tx.clone();
    thread::spawn(move || stdout_tx.send((Pipe::Stdout, drain(stdout))));
    thread::spawn(move || tx.send((Pipe::Stderr, drain(stderr))));

    let deadline = Instant::now() + timeout;
    let timed_out = |what: &str| {
        warn!(program, timeout_s = timeout.as_secs(), what, "detection engine timed out");
        AppError::EngineTimedOut {
            secs: timeout.as_secs(),
        }
    };

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(err) => {
                kill(&mut child);
                return Err(err.into());
            }
        }
        if Instant::now() >= deadline {
            kill(&mut child);
            return Err(timed_out("child still running"));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let mut out = None;
    let mut err = None;
    while out.is_none() || err.is_none() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((Pipe::Stdout, text)) => out = Some(text),
            Ok((Pipe::Stderr, text)) => err = Some(text),
            Err(RecvTimeoutError::Timeout) => return Err(timed_out("output pipes held open")),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(ProcessOutput {
        status,
        stdout: out.unwrap_or_default(),
        stderr: err.unwrap_or_default(),
    })
}

/// Start `cmd` without waiting for it or keeping any handle to its output.
///
/// Returns the child's pid. The child keeps running on its own; a
/// background thread waits on it so its exit status is collected.
pub fn spawn_detached(mut cmd: Command, program: &str) -> AppResult<u32> {
    debug!(?cmd, "spawning detached child process");
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| AppError::LiveLaunch {
            program: program.to_string(),
            source: e,
        })?;

    let pid = child.id();
    thread::spawn(move || match child.wait() {
        Ok(status) => debug!(pid, %status, "detached child exited"),
        Err(err) => debug!(pid, error = %err, "could not wait on detached child"),
    });
    Ok(pid)
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn drain(pipe: Option<impl Read>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn captures_both_streams() {
        let out = run_with_timeout(
            sh("echo out; echo err 1>&2"),
            "sh",
            Duration::from_secs(10),
        )
        .unwrap();
        assert!(out.status.success());
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[test]
    fn slow_child_times_out() {
        let err = run_with_timeout(sh("sleep 5"), "sh", Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, AppError::EngineTimedOut { .. }));
    }

    #[test]
    fn background_grandchild_cannot_outlive_deadline() {
        let started = Instant::now();
        let err = run_with_timeout(
            sh("sleep 5 &\necho started"),
            "sh",
            Duration::from_millis(500),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::EngineTimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn missing_program_is_launch_error() {
        let err = run_with_timeout(
            Command::new("/nonexistent/engine"),
            "/nonexistent/engine",
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::EngineLaunch { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn detached_child_is_reaped() {
        let pid = spawn_detached(sh("exit 0"), "sh").unwrap();
        let proc_entry = std::path::PathBuf::from(format!("/proc/{pid}"));

        let deadline = Instant::now() + Duration::from_secs(5);
        while proc_entry.exists() && Instant::now() < deadline {
            thread::sleep(POLL_INTERVAL);
        }
        assert!(!proc_entry.exists(), "pid {pid} left as a zombie");
    }
}
