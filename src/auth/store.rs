//! Persistent storage for the admin bearer credential.
//!
//! The browser front end keeps the token in `localStorage` under the
//! `adminToken` key; this is the native equivalent - a small JSON file in the
//! app config directory. At most one credential exists per profile.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Credential file name in the config directory
const TOKEN_FILE: &str = "admin_token.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    #[serde(rename = "adminToken")]
    admin_token: String,
    saved_at: DateTime<Utc>,
}

/// File-backed store for the opaque admin bearer token.
///
/// All mutations are idempotent: clearing an absent credential is a no-op,
/// and saving overwrites any previous token (one valid credential per
/// profile). Clone is cheap - the store is just a directory path.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Read the stored token, if any.
    ///
    /// An unreadable or corrupt credential file is treated as absent - the
    /// validator will fail closed anyway, so there is nothing useful to
    /// salvage from it.
    pub fn load(&self) -> Option<String> {
        let path = self.token_path();
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to read credential file");
                return None;
            }
        };
        match serde_json::from_str::<StoredCredential>(&contents) {
            Ok(stored) => Some(stored.admin_token),
            Err(e) => {
                warn!(error = %e, "Corrupt credential file, treating as absent");
                None
            }
        }
    }

    /// Persist a freshly issued token, replacing any previous one.
    pub fn save(&self, token: &str) -> Result<()> {
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredCredential {
            admin_token: token.to_string(),
            saved_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, contents).context("Failed to write credential file")?;
        Ok(())
    }

    /// Delete the stored token. No-op if none is stored.
    pub fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to delete credential file")?;
        }
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.token_path().exists()
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }
}
