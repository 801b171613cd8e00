//! Subprocess execution.
//!
//! [`CommandRunner`] is the only seam through which fork-sync touches the
//! `git` executable. The engine is generic over it so flows can be driven by
//! a scripted runner in tests.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::ExecutionError;
use crate::types::{CommandResult, Invocation};

/// Default upper bound for a single subprocess call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs one command to completion and captures its output.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult, ExecutionError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult, ExecutionError> {
        (**self).run(invocation)
    }
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Print a command/stdout/stderr trace block after every call.
    pub debug: bool,
    pub timeout: Duration,
    /// Working directory; `None` inherits the caller's.
    pub current_dir: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            timeout: DEFAULT_TIMEOUT,
            current_dir: None,
        }
    }
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    config: RunnerConfig,
}

impl ProcessRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    fn execute(&self, invocation: &Invocation) -> Result<CommandResult, ExecutionError> {
        let command = invocation.to_string();
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.config.current_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| ExecutionError::spawn(&command, &e))?;
        let stdout_reader = drain(child.stdout.take());
        let stderr_reader = drain(child.stderr.take());

        let status = wait_with_timeout(&mut child, self.config.timeout)
            .map_err(|e| ExecutionError::spawn(&command, &e))?;

        // A killed child's own children may still hold the pipes open, so
        // the reader threads are left detached instead of joined.
        let Some(status) = status else {
            return Err(ExecutionError::timed_out(
                command,
                self.config.timeout,
                "",
                "",
            ));
        };

        let stdout = join_drain(stdout_reader);
        let stderr = join_drain(stderr_reader);
        if status.success() {
            Ok(CommandResult::new(command, stdout, stderr))
        } else {
            Err(ExecutionError::exited(command, status.code(), stdout, stderr))
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult, ExecutionError> {
        let started = Instant::now();
        let result = self.execute(invocation);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(out) => {
                tracing::debug!(command = %out.command, elapsed_ms, "command succeeded");
                if self.config.debug {
                    println!("{}", render_trace(&out.command, &out.stdout, &out.stderr));
                }
            }
            Err(err) => {
                tracing::debug!(command = %err.command, kind = %err.kind, elapsed_ms, "command failed");
                if self.config.debug {
                    println!("{}", render_trace(&err.command, &err.stdout, &err.stderr));
                }
            }
        }
        result
    }
}

/// The debug trace block printed for each command.
pub fn render_trace(command: &str, stdout: &str, stderr: &str) -> String {
    format!(
        "\n - CMD    >>  {command}\n - STDOUT >>  {}\n - STDERR >>  {}",
        stdout.trim(),
        stderr.trim()
    )
}

/// Poll until the child exits or `timeout` elapses. `Ok(None)` means the
/// child was killed for running too long. A timeout too large to represent
/// as an `Instant` waits without a deadline.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    let deadline = Instant::now().checked_add(timeout);
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {}
            Err(e) => {
                reap(child);
                return Err(e);
            }
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            reap(child);
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_drain(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
