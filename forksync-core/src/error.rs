//! Error types for forksync-core.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Why a subprocess call did not produce a usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The process ran and exited unsuccessfully. `None` when killed by a signal.
    Exited { code: Option<i32> },
    /// The process could not be started at all.
    Spawn,
    /// The process outlived the configured timeout and was killed.
    TimedOut { after: Duration },
}

/// A failed subprocess call.
///
/// Mirrors what the taxonomy inspects: a human-readable `message` plus
/// whatever stdout/stderr were captured before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub command: String,
    pub kind: FailureKind,
    pub message: String,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionError {
    /// Non-zero exit. The message embeds stderr, the way `git` failures are
    /// usually reported by process wrappers.
    pub fn exited(
        command: impl Into<String>,
        code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        let command = command.into();
        let stderr = stderr.into();
        Self {
            message: format!("Command failed: {command}\n{stderr}"),
            command,
            kind: FailureKind::Exited { code },
            stdout: stdout.into(),
            stderr,
        }
    }

    pub fn spawn(command: impl Into<String>, source: &std::io::Error) -> Self {
        let command = command.into();
        Self {
            message: format!("failed to start `{command}`: {source}"),
            command,
            kind: FailureKind::Spawn,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn timed_out(
        command: impl Into<String>,
        after: Duration,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        let command = command.into();
        Self {
            message: format!("`{command}` timed out after {}s", after.as_secs()),
            command,
            kind: FailureKind::TimedOut { after },
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Exited { code: Some(code) } => write!(f, "exit code {code}"),
            FailureKind::Exited { code: None } => write!(f, "terminated by signal"),
            FailureKind::Spawn => write!(f, "spawn failure"),
            FailureKind::TimedOut { after } => write!(f, "timeout after {}s", after.as_secs()),
        }
    }
}

/// Errors from loading the optional settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Parsed fine but holds a value the tool cannot use.
    #[error("invalid settings at {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    /// `dirs::config_dir()` returned `None`.
    #[error("cannot determine config directory; set $HOME or equivalent")]
    ConfigDirNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SettingsError {
    SettingsError::Io {
        path: path.into(),
        source,
    }
}
