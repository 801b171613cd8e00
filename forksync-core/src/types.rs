//! Domain types shared by the engine and the CLI.

use std::fmt;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

pub const DEFAULT_UPSTREAM: &str = "upstream";
pub const DEFAULT_BRANCH: &str = "master";

/// Merge strategy option applied when upstream and local changes conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictMode {
    #[default]
    None,
    /// `-X theirs`: take incoming upstream changes.
    PreferTheirs,
    /// `-X ours`: keep local changes.
    PreferOurs,
}

impl ConflictMode {
    /// Strategy option arguments to splice into `git merge`.
    pub fn merge_args(self) -> &'static [&'static str] {
        match self {
            ConflictMode::None => &[],
            ConflictMode::PreferTheirs => &["-X", "theirs"],
            ConflictMode::PreferOurs => &["-X", "ours"],
        }
    }
}

/// Everything one invocation was asked to do. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub upstream: String,
    pub branch: String,
    pub conflict_mode: ConflictMode,
    pub add: Option<String>,
    pub remove: Option<String>,
    pub reset: bool,
    pub log: bool,
    pub log_only: bool,
    pub debug: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            upstream: DEFAULT_UPSTREAM.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            conflict_mode: ConflictMode::None,
            add: None,
            remove: None,
            reset: false,
            log: false,
            log_only: false,
            debug: false,
        }
    }
}

/// The single flow an invocation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Sync,
    AddRemote { name: String, url: String },
    RemoveRemote { name: String },
    Reset,
    LogOnly,
}

impl SyncOptions {
    /// Pick the active flow. Priority: add > remove > reset > log-only > sync.
    pub fn flow(&self) -> Flow {
        if let Some(url) = &self.add {
            return Flow::AddRemote {
                name: self.upstream.clone(),
                url: url.clone(),
            };
        }
        if let Some(name) = &self.remove {
            return Flow::RemoveRemote { name: name.clone() };
        }
        if self.reset {
            return Flow::Reset;
        }
        if self.log_only {
            return Flow::LogOnly;
        }
        Flow::Sync
    }

    /// `<upstream>/<branch>`, the ref merged from and reset to.
    pub fn upstream_ref(&self) -> String {
        format!("{}/{}", self.upstream, self.branch)
    }
}

// ---------------------------------------------------------------------------
// Subprocess values
// ---------------------------------------------------------------------------

/// A program plus its argument vector. Executed directly, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured output of one successful subprocess call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn new(
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}
