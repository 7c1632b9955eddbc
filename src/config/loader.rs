use std::env;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::types::AdminError;

use super::{paths, Config};

pub const API_URL_ENV: &str = "SUCURSAL_API_URL";
pub const TOKEN_FILE_ENV: &str = "SUCURSAL_TOKEN_FILE";

impl Config {
    /// Load configuration from config.json in the app directory, or from
    /// `explicit` when given. Falls back to defaults if the file doesn't exist
    /// or can't be parsed. Environment overrides are applied last.
    pub async fn load(explicit: Option<&Path>) -> Self {
        let loaded = match explicit {
            Some(path) => Self::try_load_from(path).await,
            None => match paths::get_config_path() {
                Ok(path) => Self::try_load_from(&path).await,
                Err(err) => Err(err),
            },
        };

        let mut config = match loaded {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "Failed to load config.json, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| env::var(key).ok());

        info!(
            api_url = %config.api_url,
            token_file = %config.token_file,
            "Loaded configuration"
        );
        config
    }

    pub async fn try_load_from(path: &Path) -> Result<Self, AdminError> {
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .await
            .map_err(|err| AdminError::Config(format!("Failed to read config file: {err}")))?;

        let config: Config = serde_json::from_str(&contents)
            .map_err(|err| AdminError::Config(format!("Failed to parse config.json: {err}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Apply non-empty values from `lookup` over the loaded settings.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(url) = non_empty(API_URL_ENV) {
            self.api_url = url;
        }
        if let Some(file) = non_empty(TOKEN_FILE_ENV) {
            self.token_file = file;
        }
    }

    fn validate(&self) -> Result<(), AdminError> {
        if self.api_url.trim().is_empty() {
            return Err(AdminError::Config("api_url must not be empty".to_string()));
        }
        if self.upload_attempts == 0 {
            return Err(AdminError::Config(
                "upload_attempts must be at least 1".to_string(),
            ));
        }
        if self.task_poll_interval_secs == 0 {
            return Err(AdminError::Config(
                "task_poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(AdminError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
