use serde::{Deserialize, Serialize};

use crate::api_client::models::Sucursal;
use crate::types::AdminError;

/// Successful exchange: the status code and the decoded body, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: u16,
    pub data: Option<T>,
}

/// The `{data, error, status}` shape handed to shells and panels.
///
/// `error` is `None` both on success and on a tolerated 404, in which case
/// `data` is `None` too.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: Option<u16>,
}

impl<T> ApiResponse<T> {
    pub fn from_result(result: Result<Reply<T>, AdminError>) -> Self {
        match result {
            Ok(reply) => Self {
                data: reply.data,
                error: None,
                status: Some(reply.status),
            },
            Err(err) => Self {
                data: None,
                status: err.status(),
                error: Some(err.to_string()),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// `/sucursales/` wraps its list in a `data` field.
#[derive(Debug, Clone, Deserialize)]
pub struct SucursalesEnvelope {
    #[serde(default)]
    pub data: Vec<Sucursal>,
}
