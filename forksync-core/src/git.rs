//! Every `git` command line fork-sync issues.

use crate::types::{ConflictMode, Invocation};

const GIT: &str = "git";

fn git<const N: usize>(args: [&str; N]) -> Invocation {
    Invocation::new(GIT, args)
}

pub fn version() -> Invocation {
    git(["--version"])
}

pub fn checkout(branch: &str) -> Invocation {
    git(["checkout", branch])
}

/// Verbose fetch; the transfer trace on stderr tells whether anything moved.
pub fn fetch_verbose(upstream: &str) -> Invocation {
    git(["fetch", upstream, "-v"])
}

pub fn fetch(upstream: &str) -> Invocation {
    git(["fetch", upstream])
}

/// `git merge [-X theirs|-X ours] <upstream>/<branch> <branch> -v`
pub fn merge(upstream_ref: &str, branch: &str, mode: ConflictMode) -> Invocation {
    let mut args: Vec<&str> = vec!["merge"];
    args.extend_from_slice(mode.merge_args());
    args.extend([upstream_ref, branch, "-v"]);
    Invocation::new(GIT, args)
}

pub fn push_verbose() -> Invocation {
    git(["push", "-v"])
}

pub fn push_force() -> Invocation {
    git(["push", "-f"])
}

pub fn log_recent() -> Invocation {
    git(["log", "--oneline", "-n", "10", "--no-decorate"])
}

pub fn status() -> Invocation {
    git(["status"])
}

pub fn status_short() -> Invocation {
    git(["status", "-s"])
}

pub fn merge_abort() -> Invocation {
    git(["merge", "--abort"])
}

pub fn reset_hard(upstream_ref: &str) -> Invocation {
    git(["reset", "--hard", upstream_ref])
}

pub fn remote_add(name: &str, url: &str) -> Invocation {
    git(["remote", "add", name, url])
}

pub fn remote_remove(name: &str) -> Invocation {
    git(["remote", "remove", name])
}

pub fn remote_list() -> Invocation {
    git(["remote", "-v"])
}

pub fn branch_list() -> Invocation {
    git(["branch"])
}

/// Paths still carrying unresolved conflicts.
pub fn unmerged_files() -> Invocation {
    git(["diff", "--name-only", "--diff-filter=U"])
}
