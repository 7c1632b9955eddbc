use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::AdminError;

use super::Config;

impl Config {
    /// Get the root directory of the application
    pub fn app_root_dir() -> Result<PathBuf, AdminError> {
        let config_path = get_config_path()?;
        match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
            Some(_) => std::env::current_dir().map_err(|err| {
                AdminError::Config(format!("Failed to determine app root: {err}"))
            }),
            None => Err(AdminError::Config(
                "Unable to determine app root directory".to_string(),
            )),
        }
    }

    /// Resolve the token file, anchoring relative paths at the app root.
    pub fn token_file_path(&self) -> Result<PathBuf, AdminError> {
        let configured = Path::new(&self.token_file);
        if configured.is_absolute() {
            return Ok(configured.to_path_buf());
        }
        Ok(Self::app_root_dir()?.join(configured))
    }
}

/// Get the path to the config.json file
/// Looks for config.json in the app directory (parent of the bin folder)
pub(super) fn get_config_path() -> Result<PathBuf, AdminError> {
    // Executable is at: app_root/bin/sucursal-admin
    // Config should be at: app_root/config.json
    if let Ok(exe_path) = std::env::current_exe() {
        debug!(path = %exe_path.display(), "Executable path detected");

        if let Some(app_root) = exe_path.parent().and_then(Path::parent) {
            let config_path = app_root.join("config.json");
            debug!(path = %config_path.display(), "Looking for config");
            return Ok(config_path);
        }
    }

    warn!("Using fallback: looking for config.json in current directory");
    Ok(PathBuf::from("config.json"))
}
