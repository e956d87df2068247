//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the backend base URL and the last email used to log in.
//!
//! Configuration is stored at `~/.config/hausgate/config.json`. The backend
//! URL resolves config value first, then the `HAUSGATE_BACKEND_URL`
//! environment variable, then the local development default.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config directory paths
const APP_NAME: &str = "hausgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment override for the backend base URL
const BACKEND_URL_ENV: &str = "HAUSGATE_BACKEND_URL";

/// Local development backend
const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the stored credential.
    pub fn credential_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    /// Resolve the backend base URL: config value, then environment, then
    /// the localhost default.
    pub fn backend_url(&self) -> String {
        if let Some(ref url) = self.backend_url {
            return url.clone();
        }
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.is_empty() {
                return url;
            }
        }
        DEFAULT_BACKEND_URL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_value_wins_over_default() {
        let config = Config {
            backend_url: Some("https://shop.example.com".to_string()),
            last_email: None,
        };
        assert_eq!(config.backend_url(), "https://shop.example.com");
    }

    #[test]
    fn test_default_backend_is_local_dev() {
        let config = Config::default();
        // Only meaningful when the env override is unset in the test run
        if std::env::var(BACKEND_URL_ENV).is_err() {
            assert_eq!(config.backend_url(), DEFAULT_BACKEND_URL);
        }
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = Config {
            backend_url: Some("https://shop.example.com".to_string()),
            last_email: Some("a@b.com".to_string()),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.backend_url, config.backend_url);
        assert_eq!(back.last_email, config.last_email);
    }
}
