use reqwest::Method;
use serde_json::Value;
use tracing::info;

use crate::types::AdminError;

use super::super::api::TruncateRequest;
use super::super::client::{to_body, ApiClient, NotFound};
use super::super::helpers::encode_list;
use super::super::models::{DatabaseStatus, TableList};

/// Schema maintenance endpoints under `/core/`.
pub struct DatabaseApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DatabaseApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn check_database(&self) -> Result<DatabaseStatus, AdminError> {
        self.client
            .fetch_json("/core/check_database/", Method::GET, None)
            .await
    }

    pub async fn validate_tables(&self) -> Result<TableList, AdminError> {
        self.client
            .fetch_json("/core/validate_tables/", Method::GET, None)
            .await
    }

    pub async fn create_tables(&self) -> Result<Value, AdminError> {
        info!("Creating tables");
        self.message_call("/core/create_tables/", Method::POST, None)
            .await
    }

    pub async fn truncate_tables(&self, tables: &[String]) -> Result<Value, AdminError> {
        require_tables(tables)?;
        info!(tables = ?tables, "Truncating tables");
        let body = to_body(&TruncateRequest { tables })?;
        self.message_call("/core/truncate_tables/", Method::POST, Some(body))
            .await
    }

    pub async fn delete_tables(&self, tables: &[String]) -> Result<Value, AdminError> {
        require_tables(tables)?;
        info!(tables = ?tables, "Dropping tables");
        let endpoint = format!("/core/delete_table/?tables={}", encode_list(tables));
        self.message_call(&endpoint, Method::DELETE, None).await
    }

    async fn message_call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, AdminError> {
        Ok(self
            .client
            .execute_json(endpoint, method, body, NotFound::Error)
            .await?
            .unwrap_or(Value::Null))
    }
}

fn require_tables(tables: &[String]) -> Result<(), AdminError> {
    if tables.is_empty() {
        return Err(AdminError::InvalidInput(
            "at least one table name is required".to_string(),
        ));
    }
    Ok(())
}
