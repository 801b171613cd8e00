//! Flow orchestration.
//!
//! One invocation runs exactly one flow, chosen by [`SyncOptions::flow`]:
//!
//! ```text
//! sync:    verify → checkout → fetch → merge → push → (log) → done
//! reset:   status → (merge --abort) → checkout → fetch → reset --hard → push -f
//! add:     remote add → remote -v
//! remove:  remote remove → remote -v
//! log:     log
//! ```
//!
//! Steps run strictly in order; each waits for the previous subprocess to
//! exit. The first failed step ends the flow and hands the error to
//! [`diagnose`]. Nothing is retried.

use forksync_core::{
    classify, git, remote_names, CommandResult, CommandRunner, ExecutionError, FailureKind,
    Flow, Invocation, OutcomeSignal, SyncOptions,
};

use crate::report::{Notice, Reporter};
use crate::taxonomy::{diagnose, Diagnosis};

/// Terminal state of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Synced,
    /// Merge had nothing to integrate; push was skipped.
    AlreadyUpToDate,
    /// Local branch has unpublished commits; sync stopped after checkout.
    AheadOfRemote,
    RemoteAdded { name: String, verified: bool },
    RemoteRemoved { name: String, verified: bool },
    ResetDone,
    Logged,
    Failed(Diagnosis),
}

impl FlowOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, FlowOutcome::Failed(_))
    }
}

pub struct Orchestrator<R, P> {
    runner: R,
    reporter: P,
}

impl<R: CommandRunner, P: Reporter> Orchestrator<R, P> {
    pub fn new(runner: R, reporter: P) -> Self {
        Self { runner, reporter }
    }

    /// Run the flow selected by `opts` to a terminal state.
    pub fn run(&mut self, opts: &SyncOptions) -> FlowOutcome {
        let flow = opts.flow();
        tracing::info!(?flow, upstream = %opts.upstream, branch = %opts.branch, "starting flow");

        let result = match flow {
            Flow::Sync => self.sync(opts),
            Flow::AddRemote { name, url } => self.add_remote(name, &url),
            Flow::RemoveRemote { name } => self.remove_remote(name),
            Flow::Reset => self.reset(opts),
            Flow::LogOnly => self.log().map(|()| FlowOutcome::Logged),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => FlowOutcome::Failed(diagnose(&self.runner, &mut self.reporter, error)),
        };
        tracing::info!(failed = outcome.is_failure(), "flow finished");
        outcome
    }

    fn exec(&self, invocation: Invocation) -> Result<(CommandResult, Signals), ExecutionError> {
        let result = self.runner.run(&invocation)?;
        let signals = Signals(classify(&result));
        Ok((result, signals))
    }

    fn sync(&mut self, opts: &SyncOptions) -> Result<FlowOutcome, ExecutionError> {
        // No git on PATH shows up as a spawn failure, not a missing banner.
        let (_, verify) = match self.exec(git::version()) {
            Err(error) if error.kind == FailureKind::Spawn => {
                self.reporter.notice(Notice::ToolNotInstalled);
                return Err(error);
            }
            other => other?,
        };
        if verify.has(OutcomeSignal::ToolBanner) {
            self.reporter.notice(Notice::Started);
        } else {
            self.reporter.notice(Notice::ToolNotInstalled);
        }

        let (_, checkout) = self.exec(git::checkout(&opts.branch))?;
        if checkout.has(OutcomeSignal::AheadOfRemote) {
            self.reporter.notice(Notice::AheadOfRemote);
            return Ok(FlowOutcome::AheadOfRemote);
        }

        let (_, fetch) = self.exec(git::fetch_verbose(&opts.upstream))?;
        if fetch.has(OutcomeSignal::FetchTransferred) {
            self.reporter.notice(Notice::Fetched);
        }

        let (_, merge) = self.exec(git::merge(
            &opts.upstream_ref(),
            &opts.branch,
            opts.conflict_mode,
        ))?;
        if merge.has(OutcomeSignal::AlreadyUpToDate) {
            self.reporter.notice(Notice::AlreadyUpToDate);
            return Ok(FlowOutcome::AlreadyUpToDate);
        }
        if merge.has(OutcomeSignal::Updated) {
            self.reporter.notice(Notice::Merged);
        }

        let (_, push) = self.exec(git::push_verbose())?;
        if push.has(OutcomeSignal::PushTransferred) {
            self.reporter.notice(Notice::Pushed);
        }

        self.reporter.notice(Notice::Synced);
        if opts.log {
            self.log()?;
        }
        Ok(FlowOutcome::Synced)
    }

    fn reset(&mut self, opts: &SyncOptions) -> Result<FlowOutcome, ExecutionError> {
        // A hard reset fails against an index that still has unmerged paths.
        let (_, status) = self.exec(git::status())?;
        if status.has(OutcomeSignal::UnmergedPaths) {
            tracing::info!("aborting in-progress merge before reset");
            self.exec(git::merge_abort())?;
        }

        self.exec(git::checkout(&opts.branch))?;
        self.exec(git::fetch(&opts.upstream))?;
        self.reporter.notice(Notice::Fetched);
        self.exec(git::reset_hard(&opts.upstream_ref()))?;
        self.reporter.notice(Notice::ResetApplied);
        self.exec(git::push_force())?;
        self.reporter.notice(Notice::ResetDone);
        Ok(FlowOutcome::ResetDone)
    }

    fn add_remote(&mut self, name: String, url: &str) -> Result<FlowOutcome, ExecutionError> {
        self.exec(git::remote_add(&name, url))?;
        let (listing, _) = self.exec(git::remote_list())?;
        let verified = remote_names(&listing.stdout).contains(&name);
        if verified {
            self.reporter.notice(Notice::RemoteAdded { name: name.clone() });
        } else {
            tracing::warn!(remote = %name, "remote missing from listing after add");
        }
        Ok(FlowOutcome::RemoteAdded { name, verified })
    }

    fn remove_remote(&mut self, name: String) -> Result<FlowOutcome, ExecutionError> {
        self.exec(git::remote_remove(&name))?;
        let (listing, _) = self.exec(git::remote_list())?;
        let verified = !remote_names(&listing.stdout).contains(&name);
        if verified {
            self.reporter.notice(Notice::RemoteRemoved { name: name.clone() });
        } else {
            tracing::warn!(remote = %name, "remote still listed after remove");
        }
        Ok(FlowOutcome::RemoteRemoved { name, verified })
    }

    fn log(&mut self) -> Result<(), ExecutionError> {
        let (log, _) = self.exec(git::log_recent())?;
        self.reporter.commit_log(&log.stdout);
        Ok(())
    }
}

struct Signals(std::collections::BTreeSet<OutcomeSignal>);

impl Signals {
    fn has(&self, signal: OutcomeSignal) -> bool {
        self.0.contains(&signal)
    }
}
