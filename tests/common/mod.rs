#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use reqwest::Method;

use sucursal_admin::api_client::{HttpReply, HttpRequest, HttpTransport};
use sucursal_admin::session::{MemoryTokenStore, TokenStore};
use sucursal_admin::{AdminError, ApiClient, Session};

pub const BASE_URL: &str = "http://api.test/api";

type Handler = dyn Fn(&HttpRequest) -> Result<HttpReply, AdminError> + Send + Sync;

/// Answers requests from a closure and records everything it was sent.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    refresh_delay: Option<Duration>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpReply, AdminError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            refresh_delay: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Make `/token/refresh/` take a while so concurrent callers overlap.
    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = Some(delay);
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<HttpRequest> {
        self.sent()
            .into_iter()
            .filter(|request| path_of(request) == path)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpReply, AdminError> {
        self.sent.lock().unwrap().push(request.clone());
        if path_of(&request) == "/token/refresh/" {
            if let Some(delay) = self.refresh_delay {
                tokio::time::sleep(delay).await;
            }
        }
        (self.handler)(&request)
    }
}

/// Path and query relative to [`BASE_URL`].
pub fn path_of(request: &HttpRequest) -> &str {
    request.url.strip_prefix(BASE_URL).unwrap_or(&request.url)
}

pub fn reply(status: u16, body: &str) -> Result<HttpReply, AdminError> {
    Ok(HttpReply {
        status,
        body: body.to_string(),
    })
}

pub fn json_reply(status: u16, body: serde_json::Value) -> Result<HttpReply, AdminError> {
    reply(status, &body.to_string())
}

/// Unsigned JWT whose `exp` is `offset_secs` away from now.
pub fn jwt(offset_secs: i64) -> String {
    let exp = Utc::now().timestamp() + offset_secs;
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"token_type":"access","exp":{exp}}}"#))
    )
}

pub fn is_post(request: &HttpRequest) -> bool {
    request.method == Method::POST
}

pub struct Harness {
    pub client: ApiClient,
    pub session: Arc<Session>,
    pub transport: Arc<ScriptedTransport>,
}

pub fn harness<S>(store: S, transport: ScriptedTransport) -> Harness
where
    S: TokenStore + 'static,
{
    let session = Arc::new(Session::new(Arc::new(store)));
    let transport = Arc::new(transport);
    let client = ApiClient::new(BASE_URL, transport.clone(), session.clone());
    Harness {
        client,
        session,
        transport,
    }
}

/// A session holding a valid access token.
pub fn logged_in(transport: ScriptedTransport) -> Harness {
    harness(
        MemoryTokenStore::with_tokens(&jwt(3600), "refresh-token"),
        transport,
    )
}
