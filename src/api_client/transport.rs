use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::types::AdminError;

/// A fully resolved outgoing call.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Status and raw body text of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpReply, AdminError>;
}

/// Production transport over reqwest. Keeps a cookie store so session
/// cookies set by the backend ride along with later calls.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, AdminError> {
        let http = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(AdminError::Http)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpReply, AdminError> {
        debug!(method = %request.method, url = %request.url, "Sending request");
        let mut builder = self
            .http
            .request(request.method, &request.url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(AdminError::Http)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(AdminError::Http)?;
        Ok(HttpReply { status, body })
    }
}
