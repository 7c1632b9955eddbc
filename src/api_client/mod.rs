pub mod api;
mod client;
mod core;
mod helpers;
pub mod models;
mod transport;

pub use client::{ApiClient, NotFound};
pub use self::core::{DatabaseApi, InventoryApi, ReportsApi, SalesApi, SucursalesApi, MAX_REPORT_TABLES};
pub use helpers::is_token_expired;
pub use transport::{HttpReply, HttpRequest, HttpTransport, ReqwestTransport};
