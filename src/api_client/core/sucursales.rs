use reqwest::Method;
use tracing::info;

use crate::types::AdminError;

use super::super::api::SucursalesEnvelope;
use super::super::client::{to_body, ApiClient, NotFound};
use super::super::models::{Sucursal, SyncConfigUpdate};

/// Branch CRUD and sync settings.
pub struct SucursalesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SucursalesApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Sucursal>, AdminError> {
        let envelope: SucursalesEnvelope =
            self.client.fetch_json("/sucursales/", Method::GET, None).await?;
        info!(count = envelope.data.len(), "Fetched sucursales");
        Ok(envelope.data)
    }

    pub async fn create(&self, sucursal: &Sucursal) -> Result<Sucursal, AdminError> {
        info!(nombre = %sucursal.nombre, "Creating sucursal");
        self.client
            .fetch_json("/sucursales/agregar/", Method::POST, Some(to_body(sucursal)?))
            .await
    }

    pub async fn update(&self, id: &str, sucursal: &Sucursal) -> Result<Sucursal, AdminError> {
        info!(sucursal = %id, "Updating sucursal");
        self.client
            .fetch_json(&update_path(id), Method::PUT, Some(to_body(sucursal)?))
            .await
    }

    /// Change automatic sync settings through the regular update endpoint.
    pub async fn update_sync_config(
        &self,
        id: &str,
        update: &SyncConfigUpdate,
    ) -> Result<Sucursal, AdminError> {
        if update.is_empty() {
            return Err(AdminError::InvalidInput(
                "sync update must set autoSync or syncInterval".to_string(),
            ));
        }
        if update.sync_interval == Some(0) {
            return Err(AdminError::InvalidInput(
                "syncInterval must be at least one minute".to_string(),
            ));
        }
        info!(
            sucursal = %id,
            auto_sync = ?update.auto_sync,
            interval = ?update.sync_interval,
            "Updating sync configuration"
        );
        self.client
            .fetch_json(&update_path(id), Method::PUT, Some(to_body(update)?))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AdminError> {
        info!(sucursal = %id, "Deleting sucursal");
        let endpoint = format!("/sucursales/{}/eliminar/", urlencoding::encode(id));
        self.client
            .execute(&endpoint, Method::DELETE, None, NotFound::Error)
            .await?;
        Ok(())
    }
}

fn update_path(id: &str) -> String {
    format!("/sucursales/{}/actualizar/", urlencoding::encode(id))
}
