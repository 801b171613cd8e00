//! What the engine tells the operator, as keys rather than text.
//!
//! The message catalog (wording, icons, colour) lives in the binary; the
//! engine only decides *which* message applies.

use forksync_core::ExecutionError;

use crate::taxonomy::{FollowUp, Problem};

/// Progress and terminal notices emitted by the flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Started,
    /// `git --version` did not print its banner. Informational; the flow goes on.
    ToolNotInstalled,
    Fetched,
    Merged,
    Pushed,
    Synced,
    AlreadyUpToDate,
    AheadOfRemote,
    /// Reset flow: local branch now points at the upstream ref.
    ResetApplied,
    /// Reset flow: force push finished.
    ResetDone,
    RemoteAdded { name: String },
    RemoteRemoved { name: String },
}

/// Sink for everything user-visible that a flow produces.
pub trait Reporter {
    fn notice(&mut self, notice: Notice);

    /// A classified failure category.
    fn problem(&mut self, problem: Problem);

    /// Output of a follow-up diagnostic command.
    fn diagnostic(&mut self, follow_up: FollowUp, output: &str);

    /// A failure no category matched; surfaced raw.
    fn unclassified(&mut self, error: &ExecutionError);

    /// Raw `git log --oneline` output to display.
    fn commit_log(&mut self, stdout: &str);
}

impl<P: Reporter + ?Sized> Reporter for &mut P {
    fn notice(&mut self, notice: Notice) {
        (**self).notice(notice);
    }

    fn problem(&mut self, problem: Problem) {
        (**self).problem(problem);
    }

    fn diagnostic(&mut self, follow_up: FollowUp, output: &str) {
        (**self).diagnostic(follow_up, output);
    }

    fn unclassified(&mut self, error: &ExecutionError) {
        (**self).unclassified(error);
    }

    fn commit_log(&mut self, stdout: &str) {
        (**self).commit_log(stdout);
    }
}
