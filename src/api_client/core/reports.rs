use futures::future::try_join_all;
use reqwest::Method;
use serde_json::Value;

use crate::types::AdminError;

use super::super::client::ApiClient;
use super::super::models::TableSnapshot;

/// Largest number of tables shown side by side in a report.
pub const MAX_REPORT_TABLES: usize = 3;

pub struct ReportsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Rows of one table. Accepts a bare array or a `{data: [...]}` envelope.
    pub async fn table_data(&self, table: &str) -> Result<Vec<Value>, AdminError> {
        let endpoint = format!("/core/get_table_data/?table={}", urlencoding::encode(table));
        let body: Value = self.client.fetch_json(&endpoint, Method::GET, None).await?;
        Ok(rows_from(body))
    }

    /// Fetch several tables at once, keeping the requested order.
    pub async fn table_snapshots(&self, tables: &[String]) -> Result<Vec<TableSnapshot>, AdminError> {
        if tables.len() > MAX_REPORT_TABLES {
            return Err(AdminError::InvalidInput(format!(
                "at most {MAX_REPORT_TABLES} tables can be selected"
            )));
        }
        try_join_all(tables.iter().map(|table| async move {
            let rows = self.table_data(table).await?;
            Ok::<_, AdminError>(TableSnapshot {
                table: table.clone(),
                rows,
            })
        }))
        .await
    }
}

fn rows_from(body: Value) -> Vec<Value> {
    match body {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
