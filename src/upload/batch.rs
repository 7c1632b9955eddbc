use std::future::Future;

use futures::future::join_all;
use serde::Serialize;
use tracing::info;

use super::UploadOutcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchOutcome {
    pub sucursal_id: String,
    #[serde(flatten)]
    pub outcome: UploadOutcome,
}

/// Per-branch outcomes, in the order the branches were given.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<BranchOutcome>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|entry| entry.outcome.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &BranchOutcome> {
        self.outcomes.iter().filter(|entry| !entry.outcome.is_success())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &BranchOutcome> {
        self.outcomes.iter().filter(|entry| entry.outcome.is_success())
    }
}

/// Start `upload` for every branch at once and wait for all of them.
pub async fn for_each_branch<F, Fut>(sucursal_ids: &[String], upload: F) -> BatchReport
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = UploadOutcome>,
{
    let pending = sucursal_ids.iter().map(|id| {
        let id = id.clone();
        let task = upload(id.clone());
        async move {
            BranchOutcome {
                sucursal_id: id,
                outcome: task.await,
            }
        }
    });
    let outcomes = join_all(pending).await;

    let report = BatchReport { outcomes };
    info!(
        branches = report.outcomes.len(),
        failed = report.failed().count(),
        "Batch upload finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn one_failure_does_not_stop_the_rest() {
        let ids: Vec<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();

        let report = for_each_branch(&ids, |id| async move {
            // Finish out of order on purpose.
            let delay = if id == "1" { 3 } else { 1 };
            tokio::time::sleep(Duration::from_secs(delay)).await;
            if id == "2" {
                UploadOutcome::Failed {
                    attempts: 3,
                    error: "timeout".into(),
                }
            } else {
                UploadOutcome::Completed { data: None }
            }
        })
        .await;

        let order: Vec<_> = report.outcomes.iter().map(|o| o.sucursal_id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3"]);
        assert!(!report.all_succeeded());
        let failed: Vec<_> = report.failed().map(|o| o.sucursal_id.as_str()).collect();
        assert_eq!(failed, vec!["2"]);
        assert_eq!(report.succeeded().count(), 2);
    }

    #[tokio::test]
    async fn empty_selection_is_trivially_successful() {
        let report = for_each_branch(&[], |_| async { UploadOutcome::NoData }).await;
        assert!(report.outcomes.is_empty());
        assert!(report.all_succeeded());
    }
}
