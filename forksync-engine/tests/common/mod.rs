//! Scripted runner and recording reporter shared by the flow tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use forksync_core::{CommandResult, CommandRunner, ExecutionError, Invocation};
use forksync_engine::{FollowUp, Notice, Problem, Reporter};

enum Reply {
    Ok { stdout: String, stderr: String },
    Fail { stdout: String, stderr: String },
    Unspawnable,
}

/// Answers commands from a script keyed by the literal command line.
/// Unscripted commands succeed with empty output. Every call is recorded.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: HashMap<String, Reply>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, command: &str, stdout: &str, stderr: &str) -> Self {
        self.replies.insert(
            command.to_string(),
            Reply::Ok {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn fail(mut self, command: &str, stdout: &str, stderr: &str) -> Self {
        self.replies.insert(
            command.to_string(),
            Reply::Fail {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// The program cannot be started at all, as when it is not on `PATH`.
    pub fn unspawnable(mut self, command: &str) -> Self {
        self.replies.insert(command.to_string(), Reply::Unspawnable);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, command: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == command)
    }

    pub fn position(&self, command: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c == command)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult, ExecutionError> {
        let command = invocation.to_string();
        self.calls.borrow_mut().push(command.clone());
        match self.replies.get(&command) {
            None => Ok(CommandResult::new(command, "", "")),
            Some(Reply::Ok { stdout, stderr }) => {
                Ok(CommandResult::new(command, stdout.as_str(), stderr.as_str()))
            }
            Some(Reply::Fail { stdout, stderr }) => Err(ExecutionError::exited(
                command,
                Some(1),
                stdout.as_str(),
                stderr.as_str(),
            )),
            Some(Reply::Unspawnable) => Err(ExecutionError::spawn(
                command,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Notice(Notice),
    Problem(Problem),
    Diagnostic(FollowUp, String),
    Unclassified(String),
    CommitLog(String),
}

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn problems(&self) -> Vec<Problem> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Problem(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn notice(&mut self, notice: Notice) {
        self.events.push(Event::Notice(notice));
    }

    fn problem(&mut self, problem: Problem) {
        self.events.push(Event::Problem(problem));
    }

    fn diagnostic(&mut self, follow_up: FollowUp, output: &str) {
        self.events.push(Event::Diagnostic(follow_up, output.to_string()));
    }

    fn unclassified(&mut self, error: &ExecutionError) {
        self.events.push(Event::Unclassified(error.message.clone()));
    }

    fn commit_log(&mut self, stdout: &str) {
        self.events.push(Event::CommitLog(stdout.to_string()));
    }
}

pub const VERSION: &str = "git --version";
pub const BANNER: &str = "git version 2.43.0\n";
