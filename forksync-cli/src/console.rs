//! Terminal reporter: message catalog, icons, and single-line progress.
//!
//! In normal mode progress notices overwrite one another on a single line.
//! In debug mode every notice gets its own line so it interleaves cleanly
//! with the runner's command traces.

use std::io::Write;

use colored::Colorize;

use forksync_core::{format_commit_log, ExecutionError};
use forksync_engine::{FollowUp, Notice, Problem, Reporter};

const CLEAR_LINE: &str = "\r\x1b[2K";

fn sync_icon() -> String {
    " § ".red().to_string()
}

fn success_icon() -> String {
    "✔".green().to_string()
}

fn warning() -> String {
    "<!> warning: ".yellow().to_string()
}

pub struct ConsoleReporter {
    debug: bool,
    line_open: bool,
}

impl ConsoleReporter {
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            line_open: false,
        }
    }

    /// Terminate an open progress line.
    pub fn finish(&mut self) {
        if self.line_open {
            println!();
            self.line_open = false;
        }
    }

    fn status(&mut self, text: String) {
        if self.debug {
            println!("{text}");
            return;
        }
        print!("{CLEAR_LINE}{text}");
        let _ = std::io::stdout().flush();
        self.line_open = true;
    }

    fn block(&mut self, text: String) {
        self.finish();
        println!("{text}");
    }
}

pub fn notice_text(notice: &Notice) -> String {
    let sync = sync_icon();
    match notice {
        Notice::Started => format!("{sync}| fork-sync |"),
        Notice::ToolNotInstalled => format!(
            "{}Looks like you don't have git installed, install it at: https://git-scm.com/",
            warning()
        ),
        Notice::Fetched => format!("{sync}| fetching |"),
        Notice::Merged => format!("{sync}| updating |"),
        Notice::Pushed => format!("{sync}| pushing |"),
        Notice::Synced => format!("{sync}{}", format!("project synced {}", success_icon()).bold()),
        Notice::AlreadyUpToDate => format!("{sync}Already up to date {}", success_icon()),
        Notice::AheadOfRemote => problem_text(Problem::AheadOfRemote),
        Notice::ResetApplied => format!("{sync}| resetting |"),
        Notice::ResetDone => format!("{sync}fork reset to upstream {}", success_icon()),
        Notice::RemoteAdded { name } => format!(
            "remote added, you can now sync with: {}",
            format!("fork-sync -u {name}").green()
        ),
        Notice::RemoteRemoved { name } => format!("remote removed: {name}"),
    }
}

pub fn problem_text(problem: Problem) -> String {
    let body = match problem {
        Problem::RemoteNotRepository => format!(
            "no remote upstream found, you should add a git remote url with:\n{}",
            "fork-sync -a <remote git url>".green()
        ),
        Problem::AmbiguousRef => format!(
            "unknown upstream branch, check the names with {} {}",
            "-u <upstream> -b <branch>".green(),
            "(fetch first if the remote is new)".bright_black()
        ),
        Problem::NothingToMerge => {
            "not something we can merge, please verify your branch names".to_string()
        }
        Problem::NotARepository => format!(
            "you are not in a git repository, run {}to start",
            "git init ".green()
        ),
        Problem::RefNotFound => format!(
            "no branch found, run fork-sync -b <branch-name> {}",
            "(usually master or main)".bright_black()
        ),
        Problem::MergeConflict => {
            "your repository has conflicts, you need to resolve them manually".to_string()
        }
        Problem::IndexConflict => {
            "your repository has unresolved conflicts, you need to resolve them manually"
                .to_string()
        }
        Problem::AheadOfRemote => format!(
            "{}{}",
            "Your branch is ahead of remote upstream ".bright_black(),
            "use \"git push\" to publish your local commits".white()
        ),
        Problem::WouldOverwrite => format!(
            "{}{}",
            "Conflict, local files would be overwritten by merge".white(),
            " //Please commit or stash your changes before you merge / sync".bright_black()
        ),
        Problem::BadPathspec => format!(
            "{}{}{}",
            "Not the correct branch, run with: ".white(),
            "-b \"branchName\"".green(),
            " //by default we run with \"master\"".bright_black()
        ),
        Problem::RemoteExists => "remote url already exists:".white().to_string(),
    };
    format!("{}{body}", warning())
}

fn follow_up_heading(follow_up: FollowUp) -> &'static str {
    match follow_up {
        FollowUp::ListConflictingFiles => "conflicting files:",
        FollowUp::ShortStatus => "changed files:",
        FollowUp::ListBranches => "local branches:",
        FollowUp::ListRemotes => "remotes:",
    }
}

pub fn commit_log_text(stdout: &str) -> String {
    let formatted = format_commit_log(stdout, |hash| {
        format!("{}{}", "• ".green(), hash.bright_black())
    });
    format!("\n{}log: \n\n{formatted}", sync_icon())
}

impl Reporter for ConsoleReporter {
    fn notice(&mut self, notice: Notice) {
        let text = notice_text(&notice);
        match notice {
            Notice::RemoteAdded { .. } | Notice::RemoteRemoved { .. } => self.block(text),
            _ => self.status(text),
        }
    }

    fn problem(&mut self, problem: Problem) {
        self.block(problem_text(problem));
    }

    fn diagnostic(&mut self, follow_up: FollowUp, output: &str) {
        self.block(format!("{}\n{}", follow_up_heading(follow_up), output.trim_end()));
    }

    fn unclassified(&mut self, error: &ExecutionError) {
        self.block(format!("{}{}", warning(), error.message.trim_end()));
    }

    fn commit_log(&mut self, stdout: &str) {
        self.block(commit_log_text(stdout));
    }
}
