use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::session::Session;
use crate::types::AdminError;

use super::api::{ApiResponse, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, Reply};
use super::helpers::{is_token_expired, join_url};
use super::transport::{HttpReply, HttpRequest, HttpTransport, ReqwestTransport};

const LOGIN_PATH: &str = "/token/";
const REFRESH_PATH: &str = "/token/refresh/";

/// How a `404` answer is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFound {
    /// Surface the response body as an error.
    #[default]
    Error,
    /// Treat as "nothing here": no data and no error.
    Empty,
}

/// Authenticated client for the admin REST API.
///
/// Every call goes through [`ApiClient::execute`], which attaches the bearer
/// token, refreshes an expired access token once, and ends the session when
/// that refresh is impossible.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    session: Arc<Session>,
    upload_attempts: u32,
    poll_interval: Duration,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            session,
            upload_attempts: 3,
            poll_interval: Duration::from_secs(5),
        }
    }

    /// Build a reqwest-backed client from loaded settings.
    pub fn from_config(config: &Config, session: Arc<Session>) -> Result<Self, AdminError> {
        let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self::new(config.api_url.clone(), Arc::new(transport), session)
            .with_upload_attempts(config.upload_attempts)
            .with_poll_interval(Duration::from_secs(config.task_poll_interval_secs)))
    }

    pub fn with_upload_attempts(mut self, attempts: u32) -> Self {
        self.upload_attempts = attempts.max(1);
        self
    }

    /// A zero interval is ignored and the current one kept.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!("Ignoring zero task poll interval");
        } else {
            self.poll_interval = interval;
        }
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn upload_attempts(&self) -> u32 {
        self.upload_attempts
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Exchange credentials for a token pair and store it.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AdminError> {
        info!(username, "Logging in");
        let body = serde_json::to_value(LoginRequest { username, password })?;
        let reply = self.send_unauthenticated(LOGIN_PATH, body).await?;
        if !reply.is_success() {
            warn!(status = reply.status, "Login rejected");
            return Err(AdminError::Auth(reply.body));
        }

        let tokens: LoginResponse = serde_json::from_str(&reply.body)?;
        self.session.establish(&tokens.access, &tokens.refresh)?;
        info!(username, "Login succeeded");
        Ok(())
    }

    pub fn logout(&self, reason: &str) {
        self.session.end(reason);
    }

    /// Normalized `{data, error, status}` form of [`ApiClient::execute`].
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
        not_found: NotFound,
    ) -> ApiResponse<Value> {
        ApiResponse::from_result(self.execute(endpoint, method, body, not_found).await)
    }

    /// Run one authenticated call.
    ///
    /// Never sends an expired access token: it is refreshed first, and when
    /// that fails the session ends and the call is not made.
    pub async fn execute(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
        not_found: NotFound,
    ) -> Result<Reply<Value>, AdminError> {
        let bearer = self.access_token().await?;
        let url = join_url(&self.base_url, endpoint);
        let request = HttpRequest {
            method: method.clone(),
            url,
            bearer,
            body,
        };

        let reply = match self.transport.send(request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%method, endpoint, error = %err, "Request failed");
                return Err(err);
            }
        };

        if reply.status == 404 && not_found == NotFound::Empty {
            warn!(%method, endpoint, body = %reply.body, "No data for this request");
            return Ok(Reply {
                status: reply.status,
                data: None,
            });
        }

        if !reply.is_success() {
            warn!(%method, endpoint, status = reply.status, body = %reply.body, "HTTP error");
            return Err(AdminError::Api {
                status: reply.status,
                body: reply.body,
            });
        }

        let data = if reply.body.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str::<Value>(&reply.body)?)
        };
        debug!(%method, endpoint, status = reply.status, "Request succeeded");
        Ok(Reply {
            status: reply.status,
            data,
        })
    }

    /// [`ApiClient::execute`] with the body decoded into `T`.
    pub async fn execute_json<T>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
        not_found: NotFound,
    ) -> Result<Option<T>, AdminError>
    where
        T: DeserializeOwned,
    {
        let reply = self.execute(endpoint, method, body, not_found).await?;
        match reply.data {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Like [`ApiClient::execute_json`] but an empty body is an error.
    pub async fn fetch_json<T>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<T, AdminError>
    where
        T: DeserializeOwned,
    {
        self.execute_json(endpoint, method, body, NotFound::Error)
            .await?
            .ok_or_else(|| AdminError::Transport(format!("{endpoint} returned an empty body")))
    }

    async fn access_token(&self) -> Result<Option<String>, AdminError> {
        let tokens = self.session.tokens()?;
        let Some(access) = tokens.access else {
            return Ok(None);
        };
        if !is_token_expired(Some(&access), Utc::now().timestamp()) {
            return Ok(Some(access));
        }

        let _gate = self.session.refresh_gate().lock().await;

        // Someone else may have refreshed or logged out while we waited.
        let tokens = self.session.tokens()?;
        let Some(access) = tokens.access else {
            return Err(AdminError::Unauthenticated(
                "session ended while waiting for token refresh".to_string(),
            ));
        };
        if !is_token_expired(Some(&access), Utc::now().timestamp()) {
            debug!("Using access token refreshed by a concurrent request");
            return Ok(Some(access));
        }

        info!("Access token expired, refreshing");
        let Some(refresh) = tokens.refresh else {
            let reason = "refresh token unavailable";
            self.session.end(reason);
            return Err(AdminError::Unauthenticated(reason.to_string()));
        };

        match self.refresh_access(&refresh).await {
            Ok(new_access) => {
                self.session.replace_access(&new_access)?;
                info!("Access token refreshed");
                Ok(Some(new_access))
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed");
                let reason = format!("could not refresh token: {err}");
                self.session.end(&reason);
                Err(AdminError::Unauthenticated(reason))
            }
        }
    }

    async fn refresh_access(&self, refresh: &str) -> Result<String, AdminError> {
        let body = serde_json::to_value(RefreshRequest { refresh })?;
        let reply = self.send_unauthenticated(REFRESH_PATH, body).await?;
        if !reply.is_success() {
            return Err(AdminError::Api {
                status: reply.status,
                body: reply.body,
            });
        }
        let refreshed: RefreshResponse = serde_json::from_str(&reply.body)?;
        Ok(refreshed.access)
    }

    async fn send_unauthenticated(&self, path: &str, body: Value) -> Result<HttpReply, AdminError> {
        self.transport
            .send(HttpRequest {
                method: Method::POST,
                url: join_url(&self.base_url, path),
                bearer: None,
                body: Some(body),
            })
            .await
    }
}

/// Serialize a request body for [`ApiClient::execute`].
pub(crate) fn to_body<T: Serialize>(value: &T) -> Result<Value, AdminError> {
    Ok(serde_json::to_value(value)?)
}
