mod database;
mod inventory;
mod reports;
mod sales;
mod sucursales;

pub use database::DatabaseApi;
pub use inventory::InventoryApi;
pub use reports::{ReportsApi, MAX_REPORT_TABLES};
pub use sales::SalesApi;
pub use sucursales::SucursalesApi;

use super::client::ApiClient;

impl ApiClient {
    pub fn database(&self) -> DatabaseApi<'_> {
        DatabaseApi::new(self)
    }

    pub fn sucursales(&self) -> SucursalesApi<'_> {
        SucursalesApi::new(self)
    }

    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }

    pub fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi::new(self)
    }

    pub fn sales(&self) -> SalesApi<'_> {
        SalesApi::new(self)
    }
}
