use reqwest::Method;
use serde_json::Value;
use tracing::info;

use crate::types::AdminError;
use crate::upload::{for_each_branch, submit_with_retry, BatchReport, UploadOutcome};

use super::super::api::{DateRange, Reply, UploadRequest};
use super::super::client::{to_body, ApiClient, NotFound};
use super::super::models::TaskStatus;

/// Sales uploads. The backend processes them inline, so failures are
/// retried a bounded number of times instead of polled.
pub struct SalesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SalesApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One upload attempt. A 404 means the branch had no sales in range and
    /// comes back as an empty reply.
    pub async fn upload(&self, range: DateRange, sucursal_id: &str) -> Result<Reply<Value>, AdminError> {
        info!(
            sucursal = %sucursal_id,
            start = %range.start(),
            end = %range.end(),
            "Uploading sales"
        );
        let body = to_body(&UploadRequest::new(range, sucursal_id))?;
        self.client
            .execute("/ventas/upload/", Method::POST, Some(body), NotFound::Empty)
            .await
    }

    pub async fn upload_with_retry(&self, range: DateRange, sucursal_id: &str) -> UploadOutcome {
        submit_with_retry(self.client.upload_attempts(), || self.upload(range, sucursal_id)).await
    }

    /// Upload the same range for every branch concurrently.
    pub async fn upload_for_branches(&self, range: DateRange, sucursal_ids: &[String]) -> BatchReport {
        for_each_branch(sucursal_ids, |id| async move {
            self.upload_with_retry(range, &id).await
        })
        .await
    }

    pub async fn task_status(&self, task_id: &str) -> Result<TaskStatus, AdminError> {
        let endpoint = format!("/ventas/task_status/{}/", urlencoding::encode(task_id));
        self.client.fetch_json(&endpoint, Method::GET, None).await
    }

    /// Ask the backend to upload the last two days of sales for all branches.
    pub async fn upload_last_for_all(&self) -> Result<Value, AdminError> {
        info!("Uploading last sales for all sucursales");
        Ok(self
            .client
            .execute_json("/ventas/upload_all/", Method::POST, None, NotFound::Error)
            .await?
            .unwrap_or(Value::Null))
    }
}
