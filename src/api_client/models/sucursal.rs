use serde::{Deserialize, Serialize};

/// A branch of the business as the backend stores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sucursal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nombre: String,
    #[serde(default)]
    pub xir: String,
    #[serde(default)]
    pub xil: String,
    #[serde(default)]
    pub xiu: String,
    #[serde(default)]
    pub token: String,
    #[serde(rename = "autoSync", default, skip_serializing_if = "Option::is_none")]
    pub auto_sync: Option<bool>,
    /// Minutes between automatic syncs.
    #[serde(rename = "syncInterval", default, skip_serializing_if = "Option::is_none")]
    pub sync_interval: Option<u32>,
    #[serde(rename = "lastSync", default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<String>,
    #[serde(rename = "nextSync", default, skip_serializing_if = "Option::is_none")]
    pub next_sync: Option<String>,
    #[serde(rename = "lastDataObtain", default, skip_serializing_if = "Option::is_none")]
    pub last_data_obtain: Option<String>,
}

impl Sucursal {
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("{} ({})", self.nombre, id),
            None => self.nombre.clone(),
        }
    }
}

/// Partial update for the automatic sync settings of a branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncConfigUpdate {
    #[serde(rename = "autoSync", skip_serializing_if = "Option::is_none")]
    pub auto_sync: Option<bool>,
    #[serde(rename = "syncInterval", skip_serializing_if = "Option::is_none")]
    pub sync_interval: Option<u32>,
}

impl SyncConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.auto_sync.is_none() && self.sync_interval.is_none()
    }
}
