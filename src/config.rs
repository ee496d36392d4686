//! Client configuration and platform paths.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client settings. Fields absent from the config file fall back to the
/// defaults here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL; endpoint paths are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Resolved platform directories for the client's config and preferences.
pub struct AppPaths {
    /// Root configuration directory, e.g. `~/.config/skillwallet` on Linux
    /// or `~/Library/Application Support/skillwallet` on macOS.
    pub config_root: PathBuf,
}

impl AppPaths {
    pub fn detect() -> Result<Self> {
        let Some(base) = dirs::config_dir() else {
            bail!("Platform config directory not found")
        };
        Ok(Self {
            config_root: base.join("skillwallet"),
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_root.join("config.json")
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.config_root.join("preferences.json")
    }
}

/// Load the client config from the given file.
///
/// A missing file is the common case on first launch and yields defaults;
/// an unreadable or unparseable file is logged and also yields defaults so
/// a corrupt config never blocks startup.
pub fn load_config(path: &Path) -> ClientConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!("No config at {:?} ({}), using defaults", path, e);
            return ClientConfig::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not parse config at {:?}: {}, using defaults", path, e);
            ClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("config.json"));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "base_url": "https://api.example.edu/" }"#).unwrap();

        let config = load_config(&path);
        assert_eq!(config.base_url, "https://api.example.edu/");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_corrupt_config_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{{ nope").unwrap();

        let config = load_config(&path);
        assert_eq!(config, ClientConfig::default());
    }
}
