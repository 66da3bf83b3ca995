//! Application settings for the Selftape CLI/TUI.
//!
//! Settings live in `~/.config/selftape/settings.json` on most platforms. A
//! missing or unreadable file is never an error; defaults are used instead.

use std::fs;
use std::path::{Path, PathBuf};

use selftape_types::Role;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::kv_store::default_store_path;
use crate::path_processing::{env_or_config_path, expand_tilde};

/// Environment variable allowing callers to override the settings file path.
pub const SETTINGS_PATH_ENV: &str = "SELFTAPE_SETTINGS_PATH";

/// Environment variable overriding where the TUI writes its log file.
pub const LOG_PATH_ENV: &str = "SELFTAPE_LOG_PATH";

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const LOG_FILE_NAME: &str = "selftape.log";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Location of the key-value store file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
    /// Location of the TUI log file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
    /// Identity used when the CLI is not given `--user`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Active role used when the CLI is not given `--role`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::load_from(&default_settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse settings file; using defaults"
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Store path with precedence: settings file, then `SELFTAPE_STORE_PATH`,
    /// then the config directory default.
    pub fn resolved_store_path(&self) -> PathBuf {
        match self.store_path.as_deref().filter(|path| !path.trim().is_empty()) {
            Some(path) => expand_tilde(path),
            None => default_store_path(),
        }
    }

    pub fn resolved_log_path(&self) -> PathBuf {
        match self.log_path.as_deref().filter(|path| !path.trim().is_empty()) {
            Some(path) => expand_tilde(path),
            None => env_or_config_path(LOG_PATH_ENV, LOG_FILE_NAME),
        }
    }
}

pub fn default_settings_path() -> PathBuf {
    env_or_config_path(SETTINGS_PATH_ENV, SETTINGS_FILE_NAME)
}
