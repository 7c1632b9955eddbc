//! Client library for the sucursal administration API.
//!
//! [`api_client::ApiClient`] wraps every authenticated call, refreshing the
//! JWT access token when needed. Domain endpoints hang off it
//! (`client.sucursales()`, `client.sales()`, ...), and [`upload`] holds the
//! retry, polling and batch strategies used for per-branch uploads.

pub mod api_client;
pub mod config;
pub mod session;
pub mod types;
pub mod upload;

pub use api_client::{ApiClient, NotFound};
pub use config::Config;
pub use session::{Session, SessionEvent};
pub use types::AdminError;
