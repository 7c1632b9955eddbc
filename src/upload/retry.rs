use std::future::Future;

use serde_json::Value;
use tracing::{debug, warn};

use crate::api_client::api::Reply;
use crate::types::AdminError;

use super::UploadOutcome;

/// Submit an upload up to `attempts` times, back to back.
///
/// A 404 (tolerated or not) means the branch has no data and ends the loop,
/// as does a lost session. Exhausting the attempts yields
/// [`UploadOutcome::Failed`] rather than an error.
pub async fn submit_with_retry<F, Fut>(attempts: u32, mut submit: F) -> UploadOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Reply<Value>, AdminError>>,
{
    let attempts = attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        match submit().await {
            Ok(reply) if reply.status == 404 => return UploadOutcome::NoData,
            Ok(reply) => {
                debug!(attempt, "Upload accepted");
                return UploadOutcome::Completed { data: reply.data };
            }
            Err(err) if err.is_not_found() => return UploadOutcome::NoData,
            Err(err) if err.is_unauthenticated() => {
                return UploadOutcome::Failed {
                    attempts: attempt,
                    error: err.to_string(),
                }
            }
            Err(err) => {
                warn!(attempt, attempts, error = %err, "Upload attempt failed");
                last_error = err.to_string();
            }
        }
    }

    UploadOutcome::Failed {
        attempts,
        error: last_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn server_error() -> AdminError {
        AdminError::Api {
            status: 500,
            body: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let outcome = submit_with_retry(3, || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call < 3 {
                    Err(server_error())
                } else {
                    Ok(Reply {
                        status: 200,
                        data: Some(json!({ "inserted": 12 })),
                    })
                }
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            outcome,
            UploadOutcome::Completed {
                data: Some(json!({ "inserted": 12 }))
            }
        );
    }

    #[tokio::test]
    async fn gives_up_after_bound_without_error() {
        let calls = AtomicU32::new(0);
        let outcome = submit_with_retry(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(server_error()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            outcome,
            UploadOutcome::Failed {
                attempts: 3,
                error: "boom".to_string()
            }
        );
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn not_found_stops_retrying() {
        let calls = AtomicU32::new(0);
        let outcome = submit_with_retry(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Ok(Reply {
                    status: 404,
                    data: None,
                })
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome, UploadOutcome::NoData);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn lost_session_is_not_retried() {
        let calls = AtomicU32::new(0);
        let outcome = submit_with_retry(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AdminError::Unauthenticated("refresh token unavailable".into())) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(outcome, UploadOutcome::Failed { attempts: 1, .. }));
    }
}
