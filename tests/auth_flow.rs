mod common;

use std::sync::Mutex;
use std::time::Duration;

use reqwest::Method;
use serde_json::json;

use common::*;
use sucursal_admin::session::{MemoryTokenStore, TokenPair, TokenStore};
use sucursal_admin::{AdminError, NotFound, SessionEvent};

#[tokio::test]
async fn valid_token_is_sent_without_refresh() {
    let h = logged_in(ScriptedTransport::new(|_| {
        json_reply(200, json!({ "status": "success", "message": "ok" }))
    }));
    let token = h.session.tokens().unwrap().access.unwrap();

    let response = h
        .client
        .request("/core/check_database/", Method::GET, None, NotFound::Error)
        .await;

    assert!(response.is_ok());
    assert_eq!(response.data.unwrap()["status"], "success");
    let sent = h.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].bearer.as_deref(), Some(token.as_str()));
    assert!(h.transport.calls_to("/token/refresh/").is_empty());
}

#[tokio::test]
async fn expired_token_is_refreshed_once_then_used() {
    let fresh = jwt(3600);
    let issued = fresh.clone();
    let h = harness(
        MemoryTokenStore::with_tokens(&jwt(-60), "refresh-token"),
        ScriptedTransport::new(move |request| match path_of(request) {
            "/token/refresh/" => {
                assert_eq!(request.body, Some(json!({ "refresh": "refresh-token" })));
                assert!(request.bearer.is_none());
                json_reply(200, json!({ "access": issued }))
            }
            "/sucursales/" => json_reply(200, json!({ "data": [] })),
            other => panic!("unexpected call to {other}"),
        }),
    );
    let mut events = h.session.subscribe();

    let list = h.client.sucursales().list().await.unwrap();

    assert!(list.is_empty());
    assert_eq!(h.transport.calls_to("/token/refresh/").len(), 1);
    let calls = h.transport.calls_to("/sucursales/");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].bearer.as_deref(), Some(fresh.as_str()));
    assert_eq!(
        h.session.tokens().unwrap(),
        TokenPair::new(fresh.as_str(), "refresh-token")
    );
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Refreshed);
}

#[tokio::test]
async fn missing_refresh_token_ends_session_without_calling_endpoint() {
    let h = harness(
        AccessOnlyStore::new(&jwt(-5)),
        ScriptedTransport::new(|request| panic!("unexpected call to {}", request.url)),
    );
    let mut events = h.session.subscribe();

    let response = h
        .client
        .request("/core/validate_tables/", Method::GET, None, NotFound::Error)
        .await;

    assert_eq!(response.data, None);
    assert!(response.error.unwrap().contains("refresh token unavailable"));
    assert!(h.transport.sent().is_empty());
    assert!(h.session.tokens().unwrap().is_empty());
    assert!(matches!(
        events.try_recv().unwrap(),
        SessionEvent::LoggedOut { .. }
    ));
}

#[tokio::test]
async fn rejected_refresh_ends_session() {
    let h = harness(
        MemoryTokenStore::with_tokens(&jwt(-60), "revoked"),
        ScriptedTransport::new(|request| match path_of(request) {
            "/token/refresh/" => json_reply(401, json!({ "detail": "Token is blacklisted" })),
            other => panic!("unexpected call to {other}"),
        }),
    );
    let mut events = h.session.subscribe();

    let err = h.client.database().validate_tables().await.unwrap_err();

    assert!(err.is_unauthenticated());
    assert_eq!(h.transport.sent().len(), 1);
    assert!(h.session.tokens().unwrap().is_empty());
    match events.try_recv().unwrap() {
        SessionEvent::LoggedOut { reason } => assert!(reason.contains("blacklisted")),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_refresh_endpoint_ends_session() {
    let h = harness(
        MemoryTokenStore::with_tokens(&jwt(-60), "refresh-token"),
        ScriptedTransport::new(|request| match path_of(request) {
            "/token/refresh/" => Err(AdminError::Transport("connection reset".to_string())),
            other => panic!("unexpected call to {other}"),
        }),
    );
    let mut events = h.session.subscribe();

    let err = h.client.sucursales().list().await.unwrap_err();

    assert!(err.is_unauthenticated());
    assert!(err.to_string().contains("connection reset"));
    assert_eq!(h.transport.sent().len(), 1);
    assert!(h.session.tokens().unwrap().is_empty());
    match events.try_recv().unwrap() {
        SessionEvent::LoggedOut { reason } => assert!(reason.contains("connection reset")),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_callers_share_one_refresh() {
    let fresh = jwt(3600);
    let issued = fresh.clone();
    let h = harness(
        MemoryTokenStore::with_tokens(&jwt(-60), "refresh-token"),
        ScriptedTransport::new(move |request| match path_of(request) {
            "/token/refresh/" => json_reply(200, json!({ "access": issued })),
            _ => json_reply(200, json!({ "tables": ["ventas", "inventario"] })),
        })
        .with_refresh_delay(Duration::from_millis(50)),
    );

    let database = h.client.database();
    let (a, b, c) = tokio::join!(
        database.validate_tables(),
        database.validate_tables(),
        database.validate_tables()
    );

    assert_eq!(a.unwrap().tables.len(), 2);
    assert!(b.is_ok() && c.is_ok());
    assert_eq!(h.transport.calls_to("/token/refresh/").len(), 1);
    let calls = h.transport.calls_to("/core/validate_tables/");
    assert_eq!(calls.len(), 3);
    assert!(calls
        .iter()
        .all(|call| call.bearer.as_deref() == Some(fresh.as_str())));
}

#[tokio::test]
async fn login_stores_both_tokens() {
    let h = harness(
        MemoryTokenStore::new(),
        ScriptedTransport::new(|request| {
            assert_eq!(path_of(request), "/token/");
            assert!(is_post(request));
            assert_eq!(
                request.body,
                Some(json!({ "username": "admin", "password": "secret" }))
            );
            json_reply(200, json!({ "access": "acc", "refresh": "ref" }))
        }),
    );
    let mut events = h.session.subscribe();

    h.client.login("admin", "secret").await.unwrap();

    assert_eq!(h.session.tokens().unwrap(), TokenPair::new("acc", "ref"));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn);
}

#[tokio::test]
async fn rejected_login_leaves_store_untouched() {
    let h = harness(
        MemoryTokenStore::new(),
        ScriptedTransport::new(|_| {
            reply(401, r#"{"detail":"No active account found with the given credentials"}"#)
        }),
    );

    let err = h.client.login("admin", "wrong").await.unwrap_err();

    assert!(matches!(err, AdminError::Auth(ref body) if body.contains("No active account")));
    assert!(h.session.tokens().unwrap().is_empty());
}

#[tokio::test]
async fn anonymous_calls_carry_no_bearer() {
    let h = harness(
        MemoryTokenStore::new(),
        ScriptedTransport::new(|_| reply(401, "Authentication credentials were not provided.")),
    );

    let response = h
        .client
        .request("/sucursales/", Method::GET, None, NotFound::Error)
        .await;

    assert_eq!(response.status, Some(401));
    assert_eq!(
        response.error.as_deref(),
        Some("Authentication credentials were not provided.")
    );
    assert!(h.transport.sent()[0].bearer.is_none());
}

#[tokio::test]
async fn transport_failures_are_normalized() {
    let h = logged_in(ScriptedTransport::new(|_| {
        Err(AdminError::Transport("connection refused".into()))
    }));

    let response = h
        .client
        .request("/core/check_database/", Method::GET, None, NotFound::Error)
        .await;

    assert_eq!(response.data, None);
    assert_eq!(response.status, None);
    assert_eq!(
        response.error.as_deref(),
        Some("request failed: connection refused")
    );
}

#[tokio::test]
async fn malformed_json_is_normalized() {
    let h = logged_in(ScriptedTransport::new(|_| reply(200, "<html>oops</html>")));

    let response = h
        .client
        .request("/core/check_database/", Method::GET, None, NotFound::Error)
        .await;

    assert_eq!(response.data, None);
    assert!(response.error.unwrap().starts_with("JSON error"));
}

/// Holds an access token with no refresh token beside it.
struct AccessOnlyStore {
    tokens: Mutex<TokenPair>,
}

impl AccessOnlyStore {
    fn new(access: &str) -> Self {
        Self {
            tokens: Mutex::new(TokenPair {
                access: Some(access.to_string()),
                refresh: None,
            }),
        }
    }
}

impl TokenStore for AccessOnlyStore {
    fn get_tokens(&self) -> Result<TokenPair, AdminError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), AdminError> {
        *self.tokens.lock().unwrap() = TokenPair::new(access, refresh);
        Ok(())
    }

    fn clear_tokens(&self) -> Result<(), AdminError> {
        *self.tokens.lock().unwrap() = TokenPair::default();
        Ok(())
    }
}
