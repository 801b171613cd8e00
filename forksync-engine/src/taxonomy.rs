//! Failure taxonomy.
//!
//! A failed command is matched against a fixed table of problem categories.
//! Categories are independent: every one that matches is reported, and each
//! may name one follow-up command whose output helps the operator fix it.
//! Follow-ups are best-effort; their own failures are logged and dropped.

use std::collections::BTreeSet;

use forksync_core::{git, CommandRunner, ExecutionError, Invocation};

use crate::report::Reporter;

/// Known failure categories, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Problem {
    /// The named remote does not resolve to a repository.
    RemoteNotRepository,
    /// A ref given to `reset`/`log` is unknown.
    AmbiguousRef,
    /// The upstream ref given to `merge` does not exist.
    NothingToMerge,
    /// Current directory is not inside a repository.
    NotARepository,
    /// The branch given to `checkout` does not exist.
    RefNotFound,
    /// Merge stopped on conflicting hunks.
    MergeConflict,
    /// A previous conflict is still unresolved in the index.
    IndexConflict,
    AheadOfRemote,
    /// Uncommitted local changes block the checkout or merge.
    WouldOverwrite,
    BadPathspec,
    /// `remote add` for a name that is already configured.
    RemoteExists,
}

#[derive(Clone, Copy)]
enum Field {
    Message,
    Stdout,
    Stderr,
}

const TABLE: &[(Problem, Field, &str)] = &[
    (
        Problem::RemoteNotRepository,
        Field::Message,
        "does not appear to be a git repository",
    ),
    (Problem::AmbiguousRef, Field::Stderr, "fatal: ambiguous argument"),
    (Problem::NothingToMerge, Field::Message, "not something we can merge"),
    (Problem::NotARepository, Field::Message, "fatal: not a git repository"),
    (Problem::RefNotFound, Field::Message, "did not match any"),
    (Problem::MergeConflict, Field::Stdout, "CONFLICT"),
    (
        Problem::IndexConflict,
        Field::Stderr,
        "you need to resolve your current index",
    ),
    (Problem::AheadOfRemote, Field::Stderr, "branch is ahead of"),
    (Problem::WouldOverwrite, Field::Stderr, "would be overwritten"),
    (Problem::BadPathspec, Field::Stderr, "pathspec"),
    (Problem::RemoteExists, Field::Stderr, "already exists"),
];

/// Follow-up command run to enrich a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FollowUp {
    ListConflictingFiles,
    ShortStatus,
    ListBranches,
    ListRemotes,
}

impl FollowUp {
    pub fn invocation(self) -> Invocation {
        match self {
            FollowUp::ListConflictingFiles => git::unmerged_files(),
            FollowUp::ShortStatus => git::status_short(),
            FollowUp::ListBranches => git::branch_list(),
            FollowUp::ListRemotes => git::remote_list(),
        }
    }
}

impl Problem {
    pub fn follow_up(self) -> Option<FollowUp> {
        match self {
            Problem::MergeConflict | Problem::IndexConflict => Some(FollowUp::ListConflictingFiles),
            Problem::WouldOverwrite => Some(FollowUp::ShortStatus),
            Problem::BadPathspec => Some(FollowUp::ListBranches),
            Problem::RemoteExists => Some(FollowUp::ListRemotes),
            Problem::RemoteNotRepository
            | Problem::AmbiguousRef
            | Problem::NothingToMerge
            | Problem::NotARepository
            | Problem::RefNotFound
            | Problem::AheadOfRemote => None,
        }
    }
}

/// Every category found in one failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProblemSet(BTreeSet<Problem>);

impl ProblemSet {
    pub fn from_error(error: &ExecutionError) -> Self {
        let found = TABLE
            .iter()
            .filter(|(_, field, needle)| {
                let haystack = match field {
                    Field::Message => &error.message,
                    Field::Stdout => &error.stdout,
                    Field::Stderr => &error.stderr,
                };
                haystack.contains(needle)
            })
            .map(|(problem, _, _)| *problem)
            .collect();
        Self(found)
    }

    pub fn contains(&self, problem: Problem) -> bool {
        self.0.contains(&problem)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Problem> + '_ {
        self.0.iter().copied()
    }

    /// Distinct follow-ups for the set, in first-needed order.
    pub fn follow_ups(&self) -> Vec<FollowUp> {
        let mut out = Vec::new();
        for follow_up in self.iter().filter_map(Problem::follow_up) {
            if !out.contains(&follow_up) {
                out.push(follow_up);
            }
        }
        out
    }
}

/// What a follow-up produced. `output` is `None` when the follow-up itself failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpReport {
    pub follow_up: FollowUp,
    pub output: Option<String>,
}

/// The full account of one failed flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosis {
    pub error: ExecutionError,
    pub problems: ProblemSet,
    pub follow_ups: Vec<FollowUpReport>,
}

impl Diagnosis {
    /// No category matched; only the raw error was surfaced.
    pub fn is_unclassified(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Classify `error`, report every matching category, and run their follow-ups.
pub fn diagnose<R, P>(runner: &R, reporter: &mut P, error: ExecutionError) -> Diagnosis
where
    R: CommandRunner + ?Sized,
    P: Reporter + ?Sized,
{
    tracing::debug!(
        command = %error.command,
        kind = %error.kind,
        stderr = %error.stderr.trim(),
        "diagnosing failed command"
    );

    let problems = ProblemSet::from_error(&error);
    if problems.is_empty() {
        reporter.unclassified(&error);
        return Diagnosis {
            error,
            problems,
            follow_ups: Vec::new(),
        };
    }

    for problem in problems.iter() {
        reporter.problem(problem);
    }

    let mut follow_ups = Vec::new();
    for follow_up in problems.follow_ups() {
        let invocation = follow_up.invocation();
        let output = match runner.run(&invocation) {
            Ok(result) => {
                reporter.diagnostic(follow_up, &result.stdout);
                Some(result.stdout)
            }
            Err(err) => {
                tracing::warn!(command = %invocation, error = %err, "diagnostic follow-up failed");
                None
            }
        };
        follow_ups.push(FollowUpReport { follow_up, output });
    }

    Diagnosis {
        error,
        problems,
        follow_ups,
    }
}
