use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl DatabaseStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableList {
    #[serde(default)]
    pub tables: Vec<String>,
}

/// Rows of one table, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub table: String,
    pub rows: Vec<Value>,
}

impl TableSnapshot {
    /// Column names taken from the keys of the first row.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .and_then(Value::as_object)
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }
}
