use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::api_client::models::TaskStatus;
use crate::types::AdminError;

/// Ask for a task's status every `interval` until it reaches a terminal
/// state. The first check happens one interval after the call starts.
///
/// There is no upper bound on the number of checks; a failing status call
/// ends the loop with that error.
pub async fn poll_until_terminal<F, Fut>(
    interval: Duration,
    mut fetch: F,
) -> Result<TaskStatus, AdminError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<TaskStatus, AdminError>>,
{
    let mut checks: u32 = 0;
    loop {
        sleep(interval).await;
        let status = fetch().await?;
        checks = checks.saturating_add(1);
        debug!(checks, state = ?status.status, "Task status");
        if status.status.is_terminal() {
            return Ok(status);
        }
    }
}
