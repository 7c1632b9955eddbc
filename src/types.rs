use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("token storage error: {0}")]
    Storage(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("session ended: {0}")]
    Unauthenticated(String),

    #[error("{body}")]
    Api { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AdminError {
    /// HTTP status attached to the failure, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Api { status, .. } => Some(*status),
            AdminError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AdminError::Unauthenticated(_))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
