//! Persistence for the access/refresh token pair.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::AdminError;

/// The current credentials. Either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(rename = "refresh_token", default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: Some(access.into()),
            refresh: Some(refresh.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

pub trait TokenStore: Send + Sync {
    fn get_tokens(&self) -> Result<TokenPair, AdminError>;

    fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), AdminError>;

    fn clear_tokens(&self) -> Result<(), AdminError>;

    /// Replace the access token and keep the refresh token as is.
    fn set_access(&self, access: &str) -> Result<(), AdminError> {
        let current = self.get_tokens()?;
        match current.refresh {
            Some(refresh) => self.set_tokens(access, &refresh),
            None => Err(AdminError::Storage(
                "cannot replace access token without a refresh token".to_string(),
            )),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<TokenPair>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        Self {
            tokens: Mutex::new(TokenPair::new(access, refresh)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, TokenPair>, AdminError> {
        self.tokens
            .lock()
            .map_err(|_| AdminError::Storage("token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_tokens(&self) -> Result<TokenPair, AdminError> {
        Ok(self.lock()?.clone())
    }

    fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), AdminError> {
        *self.lock()? = TokenPair::new(access, refresh);
        Ok(())
    }

    fn clear_tokens(&self) -> Result<(), AdminError> {
        *self.lock()? = TokenPair::default();
        Ok(())
    }
}

/// Stores the pair as `{"token": ..., "refresh_token": ...}` in a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, tokens: &TokenPair) -> Result<(), AdminError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    AdminError::Storage(format!("Failed to create {}: {err}", parent.display()))
                })?;
            }
        }
        let contents = serde_json::to_string_pretty(tokens)?;
        write_private(&self.path, contents.as_bytes()).map_err(|err| {
            AdminError::Storage(format!("Failed to write {}: {err}", self.path.display()))
        })
    }
}

/// Write `contents` to `path`, readable by the owner only on unix.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // mode() only applies to newly created files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)
}

impl TokenStore for FileTokenStore {
    fn get_tokens(&self) -> Result<TokenPair, AdminError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Token file absent");
                return Ok(TokenPair::default());
            }
            Err(err) => {
                return Err(AdminError::Storage(format!(
                    "Failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };
        if contents.trim().is_empty() {
            return Ok(TokenPair::default());
        }
        serde_json::from_str(&contents).map_err(|err| {
            AdminError::Storage(format!("Failed to parse {}: {err}", self.path.display()))
        })
    }

    fn set_tokens(&self, access: &str, refresh: &str) -> Result<(), AdminError> {
        self.write(&TokenPair::new(access, refresh))
    }

    fn clear_tokens(&self) -> Result<(), AdminError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AdminError::Storage(format!(
                "Failed to remove {}: {err}",
                self.path.display()
            ))),
        }
    }
}
