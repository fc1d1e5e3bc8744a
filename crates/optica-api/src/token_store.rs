//! # Token Storage
//!
//! Where the bearer token lives between runs.
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────────────────┐
//! │ Session (in memory)  │ save → │ FileTokenStore                       │
//! │ token, claims,       │        │ <data dir>/session.json              │
//! │ last activity        │ ← load │ { "token": "...",                    │
//! └──────────────────────┘        │   "lastActivity": "2026-..." }       │
//!                                 └──────────────────────────────────────┘
//! ```
//!
//! The stored `lastActivity` lets the next run decide whether the operator
//! has been idle too long to resume the session.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// A persisted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredToken {
    pub token: String,
    pub last_activity: DateTime<Utc>,
}

impl StoredToken {
    pub fn new(token: impl Into<String>, last_activity: DateTime<Utc>) -> Self {
        StoredToken {
            token: token.into(),
            last_activity,
        }
    }

    /// True when more than `idle` has passed since the last activity.
    pub fn is_stale(&self, now: DateTime<Utc>, idle: Duration) -> bool {
        let Ok(idle) = chrono::Duration::from_std(idle) else {
            return false;
        };
        now.signed_duration_since(self.last_activity) >= idle
    }
}

/// Persistence for the session token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> ApiResult<Option<StoredToken>>;
    fn save(&self, token: &StoredToken) -> ApiResult<()>;
    fn clear(&self) -> ApiResult<()>;
}

// =============================================================================
// File Store
// =============================================================================

/// Keeps the token in a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    /// `session.json` in the platform data directory.
    ///
    /// - Linux: `~/.local/share/optica-admin/session.json`
    /// - macOS: `~/Library/Application Support/br.Optica.optica-admin/session.json`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("br", "Optica", "optica-admin").map(|dirs| dirs.data_dir().join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ApiResult<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| ApiError::TokenStore(format!("{}: {e}", self.path.display())))?;
        match serde_json::from_str(&contents) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                // A corrupt file just means "logged out".
                debug!(path = %self.path.display(), error = %e, "Ignoring unreadable token file");
                Ok(None)
            }
        }
    }

    fn save(&self, token: &StoredToken) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ApiError::TokenStore(format!("{}: {e}", parent.display())))?;
        }
        let contents = serde_json::to_string_pretty(token)?;
        fs::write(&self.path, contents)
            .map_err(|e| ApiError::TokenStore(format!("{}: {e}", self.path.display())))
    }

    fn clear(&self) -> ApiResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::TokenStore(format!("{}: {e}", self.path.display()))),
        }
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Keeps the token for the life of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<StoredToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ApiResult<Option<StoredToken>> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &StoredToken) -> ApiResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_is_stale() {
        let token = StoredToken::new("t", at(1_000));
        let idle = Duration::from_secs(15 * 60);
        assert!(!token.is_stale(at(1_000 + 899), idle));
        assert!(token.is_stale(at(1_000 + 900), idle));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        let token = StoredToken::new("abc.def.ghi", at(1_700_000_000));
        store.save(&token).unwrap();
        assert_eq!(store.load().unwrap(), Some(token));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(FileTokenStore::new(path).load().unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        let token = StoredToken::new("x", at(0));
        store.save(&token).unwrap();
        assert_eq!(store.load().unwrap(), Some(token));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
