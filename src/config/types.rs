use serde::{Deserialize, Serialize};

/// Settings for the admin client and shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Token file location. Relative paths resolve against the app root.
    #[serde(default = "default_token_file")]
    pub token_file: String,

    #[serde(default = "default_poll_interval")]
    pub task_poll_interval_secs: u64,

    #[serde(default = "default_upload_attempts")]
    pub upload_attempts: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_file: default_token_file(),
            task_poll_interval_secs: default_poll_interval(),
            upload_attempts: default_upload_attempts(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_token_file() -> String {
    "tokens.json".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_upload_attempts() -> u32 {
    3
}

fn default_request_timeout() -> u64 {
    300
}
