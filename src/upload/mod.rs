//! Upload strategies for per-branch sales and inventory jobs.
//!
//! Sales uploads run synchronously on the backend and are retried a bounded
//! number of times ([`retry`]). Inventory uploads start a background task
//! whose status is polled until it settles ([`poll`]). Either way, uploads
//! for several branches are dispatched together by [`batch`].

pub mod batch;
pub mod poll;
pub mod retry;

use serde::Serialize;
use serde_json::Value;

pub use batch::{for_each_branch, BatchReport, BranchOutcome};
pub use poll::poll_until_terminal;
pub use retry::submit_with_retry;

/// Result of uploading one branch. Never an error, so batches keep going.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UploadOutcome {
    Completed { data: Option<Value> },
    /// The backend had nothing for this branch (HTTP 404).
    NoData,
    TaskFailed { task_id: String, result: Option<Value> },
    Failed { attempts: u32, error: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Completed { .. } | UploadOutcome::NoData)
    }
}
