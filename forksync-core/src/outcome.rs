//! Outcome classification over captured `git` console output.
//!
//! Each rule is an independent substring test against one stream of a
//! [`CommandResult`]. Rules never interact, so a single result can carry
//! several signals. The patterns follow git's English console output and
//! may stop matching on other versions or locales.

use std::collections::BTreeSet;

use crate::types::CommandResult;

/// Semantic tag derived from one command's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutcomeSignal {
    /// `git --version` printed its banner.
    ToolBanner,
    /// Local branch has commits its remote counterpart lacks.
    AheadOfRemote,
    /// Fetch completed a network transfer.
    FetchTransferred,
    /// Merge found nothing to integrate.
    AlreadyUpToDate,
    /// Merge updated files.
    Updated,
    /// Push completed a network transfer.
    PushTransferred,
    /// Status reports an in-progress merge with unresolved paths.
    UnmergedPaths,
    StderrNonEmpty,
}

enum Stream {
    Stdout,
    Stderr,
}

struct Rule {
    signal: OutcomeSignal,
    stream: Stream,
    needle: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        signal: OutcomeSignal::ToolBanner,
        stream: Stream::Stdout,
        needle: "git version",
    },
    Rule {
        signal: OutcomeSignal::AheadOfRemote,
        stream: Stream::Stdout,
        needle: "branch is ahead of",
    },
    Rule {
        signal: OutcomeSignal::FetchTransferred,
        stream: Stream::Stderr,
        needle: "POST git-upload-pack",
    },
    Rule {
        signal: OutcomeSignal::AlreadyUpToDate,
        stream: Stream::Stdout,
        needle: "Already up to date",
    },
    Rule {
        signal: OutcomeSignal::Updated,
        stream: Stream::Stdout,
        needle: "Updating",
    },
    Rule {
        signal: OutcomeSignal::PushTransferred,
        stream: Stream::Stderr,
        needle: "POST git-receive-pack",
    },
    Rule {
        signal: OutcomeSignal::UnmergedPaths,
        stream: Stream::Stdout,
        needle: "have unmerged",
    },
];

/// Every signal whose rule matches `result`.
pub fn classify(result: &CommandResult) -> BTreeSet<OutcomeSignal> {
    let mut signals: BTreeSet<OutcomeSignal> = RULES
        .iter()
        .filter(|rule| {
            let haystack = match rule.stream {
                Stream::Stdout => &result.stdout,
                Stream::Stderr => &result.stderr,
            };
            haystack.contains(rule.needle)
        })
        .map(|rule| rule.signal)
        .collect();
    if !result.stderr.trim().is_empty() {
        signals.insert(OutcomeSignal::StderrNonEmpty);
    }
    signals
}

/// Remote names listed by `git remote -v`, deduplicated, in listing order.
pub fn remote_names(stdout: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in stdout.lines().filter_map(|line| line.split_whitespace().next()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Mark the abbreviated hash that starts each `git log --oneline` line.
///
/// `mark` receives the hash token and returns its decorated form; the rest
/// of each line is left as-is. Line count is preserved.
pub fn format_commit_log(stdout: &str, mark: impl Fn(&str) -> String) -> String {
    stdout
        .split('\n')
        .map(|line| match line.split_once(' ') {
            Some(("", _)) => line.to_string(),
            Some((hash, rest)) => format!("{} {rest}", mark(hash)),
            None if line.is_empty() => String::new(),
            None => mark(line),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
