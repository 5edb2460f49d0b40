//! # Session Store
//!
//! Holds the one authentication token the client knows about.
//!
//! The token is persisted to `~/.skycast/session.json` (configurable) so a
//! login survives restarts. Writes use atomic rename (write `.tmp`, then
//! `rename()`).
//!
//! The store is constructed once at startup and handed out as
//! `Arc<SessionStore>`. Gateway tasks read it from worker threads, the event
//! loop is the only writer.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// On-disk shape of the session file.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct SessionData {
    pub token: Option<String>,
}

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "session I/O error: {e}"),
            SessionError::Json(e) => write!(f, "session file is not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        SessionError::Json(e)
    }
}

#[derive(Debug)]
pub struct SessionStore {
    token: RwLock<Option<String>>,
    /// None = memory only.
    path: Option<PathBuf>,
}

impl SessionStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            token: RwLock::new(None),
            path: None,
        }
    }

    /// Open the store backed by `path`. A missing file means "logged out";
    /// a corrupt file is reported so the caller can decide to start fresh.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let data = if path.exists() {
            let json = fs::read_to_string(&path)?;
            serde_json::from_str::<SessionData>(&json)?
        } else {
            SessionData::default()
        };

        info!(
            "Session loaded from {} (token present: {})",
            path.display(),
            data.token.is_some()
        );

        Ok(Self {
            token: RwLock::new(data.token),
            path: Some(path),
        })
    }

    /// Like `open`, but falls back to an empty (still file-backed) store when
    /// the file cannot be read.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                Self {
                    token: RwLock::new(None),
                    path: Some(path),
                }
            }
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// Replace the token and persist it. The in-memory value is updated even
    /// if persisting fails.
    pub fn set_token(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.clone());
        }
        debug!("Session token set");
        self.persist(&SessionData { token: Some(token) })
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        info!("Session cleared");
        self.persist(&SessionData::default())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self, data: &SessionData) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write_json(path, data)
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), SessionError> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    #[test]
    fn test_in_memory_starts_without_token() {
        let store = SessionStore::in_memory();
        assert!(!store.has_token());
        assert_eq!(store.token(), None);
        assert!(store.path().is_none());
    }

    #[test]
    fn test_set_and_clear_token() {
        let store = SessionStore::in_memory();
        store.set_token("fake-token").unwrap();
        assert!(store.has_token());
        assert_eq!(store.token().as_deref(), Some("fake-token"));

        store.clear().unwrap();
        assert!(!store.has_token());
    }

    #[test]
    fn test_token_survives_reopen() {
        let dir = scratch_dir("session_reopen");
        let path = dir.join("session.json");

        let store = SessionStore::open(&path).unwrap();
        assert!(!store.has_token());
        store.set_token("persisted").unwrap();
        drop(store);

        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("persisted"));
        assert!(!path.with_extension("tmp").exists());

        reopened.clear().unwrap();
        let cleared = SessionStore::open(&path).unwrap();
        assert!(!cleared.has_token());
    }

    #[test]
    fn test_corrupt_file_is_reported_and_open_or_empty_recovers() {
        let dir = scratch_dir("session_corrupt");
        let path = dir.join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(SessionStore::open(&path), Err(SessionError::Json(_))));

        let store = SessionStore::open_or_empty(&path);
        assert!(!store.has_token());
        store.set_token("fresh").unwrap();
        assert_eq!(
            SessionStore::open(&path).unwrap().token().as_deref(),
            Some("fresh")
        );
    }
}
