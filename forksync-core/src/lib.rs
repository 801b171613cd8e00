//! fork-sync core library: domain types, subprocess runner, output
//! classification, settings.
//!
//! - [`types`]: options, flows, invocations, captured results
//! - [`error`]: [`ExecutionError`], [`SettingsError`]
//! - [`runner`]: [`CommandRunner`] and the process-backed [`ProcessRunner`]
//! - [`git`]: constructors for every `git` command line the tool issues
//! - [`outcome`]: substring rules that turn captured output into signals
//! - [`settings`]: optional YAML defaults file

pub mod error;
pub mod git;
pub mod outcome;
pub mod runner;
pub mod settings;
pub mod types;

pub use error::{ExecutionError, FailureKind, SettingsError};
pub use outcome::{classify, format_commit_log, remote_names, OutcomeSignal};
pub use runner::{CommandRunner, ProcessRunner, RunnerConfig};
pub use settings::{Settings, UpdateCheckSettings};
pub use types::{CommandResult, ConflictMode, Flow, Invocation, SyncOptions};
