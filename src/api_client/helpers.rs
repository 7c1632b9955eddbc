use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<f64>,
}

/// Whether `token` must be refreshed before use.
///
/// Absent, malformed or undecodable tokens count as expired, as do tokens
/// without an `exp` claim. A token is still valid in the second it expires.
pub fn is_token_expired(token: Option<&str>, now_secs: i64) -> bool {
    let Some(token) = token else {
        return true;
    };
    match expiry_of(token) {
        Some(exp) => exp < now_secs as f64,
        None => {
            debug!("Access token could not be decoded, treating as expired");
            true
        }
    }
}

fn expiry_of(token: &str) -> Option<f64> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) if !payload.is_empty() => payload,
        _ => return None,
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims.exp
}

/// Join the API base with an endpoint path that starts with `/`.
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Comma-joined, percent-encoded list for `?tables=a,b` style queries.
pub fn encode_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| urlencoding::encode(item).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}
