//! # forksync-engine
//!
//! Flow orchestration and failure diagnosis.
//!
//! Build an [`Orchestrator`] over any [`CommandRunner`](forksync_core::CommandRunner)
//! and [`Reporter`], then call [`Orchestrator::run`] with the invocation's
//! [`SyncOptions`](forksync_core::SyncOptions). The returned [`FlowOutcome`]
//! is the flow's terminal state; nothing in this crate exits the process.

pub mod orchestrator;
pub mod report;
pub mod taxonomy;

pub use orchestrator::{FlowOutcome, Orchestrator};
pub use report::{Notice, Reporter};
pub use taxonomy::{diagnose, Diagnosis, FollowUp, FollowUpReport, Problem, ProblemSet};
