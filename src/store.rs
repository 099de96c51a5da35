//! Session persistence for the Converge CLI
//!
//! The session file holds the token pair plus the identity of the logged-in
//! user. The identity part matters: rating submissions need an explicit
//! rater id, and it comes from here rather than from any ambient state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{ConvergeError, Result};

/// Identity of the logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: i64,
    pub username: String,
}

/// Persisted session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub identity: SessionIdentity,
}

impl StoredSession {
    /// Whether the access token is past (or within 30 seconds of) expiry
    pub fn access_expired(&self) -> bool {
        Utc::now() + chrono::Duration::seconds(30) >= self.access_expires_at
    }

    /// Whether the refresh token is past expiry
    pub fn refresh_expired(&self) -> bool {
        Utc::now() >= self.refresh_expires_at
    }
}

/// File-backed session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the stored session, if any
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| ConvergeError::io_from_error("Failed to read session file", e))?;
        let session: StoredSession = serde_json::from_str(&contents)
            .map_err(|e| ConvergeError::serialization(format!("corrupt session file: {}", e)))?;
        Ok(Some(session))
    }

    /// Persist the session, creating parent directories as needed
    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConvergeError::io_from_error("Failed to create session dir", e))?;
        }

        let contents = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, contents)
            .map_err(|e| ConvergeError::io_from_error("Failed to write session file", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms)
                .map_err(|e| ConvergeError::io_from_error("Failed to set session perms", e))?;
        }

        Ok(())
    }

    /// Remove the stored session
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| ConvergeError::io_from_error("Failed to remove session file", e))?;
        }
        Ok(())
    }
}
