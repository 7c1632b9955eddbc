use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use crate::types::AdminError;
use crate::upload::{for_each_branch, poll_until_terminal, BatchReport, UploadOutcome};

use super::super::api::{DateRange, UploadRequest};
use super::super::client::{to_body, ApiClient, NotFound};
use super::super::models::{TaskHandle, TaskState, TaskStatus};

/// Inventory uploads. Each upload starts a background task that is polled
/// until it settles.
pub struct InventoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InventoryApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn upload(&self, range: DateRange, sucursal_id: &str) -> Result<TaskHandle, AdminError> {
        info!(
            sucursal = %sucursal_id,
            start = %range.start(),
            end = %range.end(),
            "Starting inventory upload"
        );
        let body = to_body(&UploadRequest::new(range, sucursal_id))?;
        let handle: TaskHandle = self
            .client
            .fetch_json("/inventory/upload/", Method::POST, Some(body))
            .await?;
        info!(sucursal = %sucursal_id, task = %handle.task_id, "Inventory task queued");
        Ok(handle)
    }

    pub async fn task_status(&self, task_id: &str) -> Result<TaskStatus, AdminError> {
        let endpoint = format!("/inventory/task_status/{}/", urlencoding::encode(task_id));
        self.client.fetch_json(&endpoint, Method::GET, None).await
    }

    /// Poll a task until it reaches `SUCCESS` or `FAILURE`.
    pub async fn wait_for_task(&self, task_id: &str) -> Result<TaskStatus, AdminError> {
        poll_until_terminal(self.client.poll_interval(), || self.task_status(task_id)).await
    }

    /// Upload and wait; `true` when the task ended in `SUCCESS`.
    pub async fn upload_and_wait(
        &self,
        range: DateRange,
        sucursal_id: &str,
    ) -> Result<bool, AdminError> {
        let handle = self.upload(range, sucursal_id).await?;
        let status = self.wait_for_task(&handle.task_id).await?;
        Ok(status.status == TaskState::Success)
    }

    /// Like [`InventoryApi::upload_and_wait`], folded into an outcome that
    /// never aborts a batch.
    pub async fn upload_tracked(&self, range: DateRange, sucursal_id: &str) -> UploadOutcome {
        let handle = match self.upload(range, sucursal_id).await {
            Ok(handle) => handle,
            Err(err) if err.is_not_found() => return UploadOutcome::NoData,
            Err(err) => {
                warn!(sucursal = %sucursal_id, error = %err, "Inventory upload not started");
                return UploadOutcome::Failed {
                    attempts: 1,
                    error: err.to_string(),
                };
            }
        };

        match self.wait_for_task(&handle.task_id).await {
            Ok(status) if status.status == TaskState::Success => {
                info!(sucursal = %sucursal_id, task = %handle.task_id, "Inventory upload finished");
                UploadOutcome::Completed {
                    data: status.result,
                }
            }
            Ok(status) => {
                warn!(sucursal = %sucursal_id, task = %handle.task_id, "Inventory task failed");
                UploadOutcome::TaskFailed {
                    task_id: handle.task_id,
                    result: status.result,
                }
            }
            Err(err) => {
                warn!(sucursal = %sucursal_id, error = %err, "Lost track of inventory task");
                UploadOutcome::Failed {
                    attempts: 1,
                    error: err.to_string(),
                }
            }
        }
    }

    /// Upload the same range for every branch concurrently.
    pub async fn upload_for_branches(&self, range: DateRange, sucursal_ids: &[String]) -> BatchReport {
        for_each_branch(sucursal_ids, |id| async move { self.upload_tracked(range, &id).await })
            .await
    }

    /// Ask the backend to upload the last two days of inventory for all branches.
    pub async fn upload_last_for_all(&self) -> Result<Value, AdminError> {
        info!("Uploading last inventory for all sucursales");
        Ok(self
            .client
            .execute_json("/inventory/upload_all/", Method::POST, None, NotFound::Error)
            .await?
            .unwrap_or(Value::Null))
    }
}
