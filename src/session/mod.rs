//! Session token storage.
//!
//! The API client reads the token through [`SessionStore`] on every request;
//! only login writes it and only logout clears it.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::db::Database;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(String),
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Single-slot holder for the bearer token.
pub trait SessionStore: Send + Sync {
    fn set_token(&self, token: &str) -> Result<(), SessionError>;
    fn get_token(&self) -> Result<Option<String>, SessionError>;
    fn clear_token(&self) -> Result<(), SessionError>;

    /// When the current token was stored, if the backend records it.
    fn saved_at(&self) -> Result<Option<DateTime<Utc>>, SessionError> {
        Ok(None)
    }
}

/// Process-local session, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        *self.token.lock().map_err(|_| SessionError::Poisoned)? = Some(token.to_string());
        Ok(())
    }

    fn get_token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.lock().map_err(|_| SessionError::Poisoned)?.clone())
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        *self.token.lock().map_err(|_| SessionError::Poisoned)? = None;
        Ok(())
    }
}

/// Persistent session stored in SQLite, keyed by API origin.
pub struct SqliteSessionStore {
    db: Mutex<Database>,
    origin: String,
}

impl SqliteSessionStore {
    /// Open the session database at `path`, scoped to the origin of `api_url`.
    pub fn open(path: &Path, api_url: &Url) -> Result<Self, SessionError> {
        let db = Database::open(path).map_err(SessionError::Storage)?;
        Self::from_database(db, api_url)
    }

    pub fn from_database(db: Database, api_url: &Url) -> Result<Self, SessionError> {
        db.migrate().map_err(SessionError::Storage)?;
        Ok(Self {
            db: Mutex::new(db),
            origin: origin_key(api_url),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl SessionStore for SqliteSessionStore {
    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let db = self.db.lock().map_err(|_| SessionError::Poisoned)?;
        db.set_session(&self.origin, token)
            .map_err(SessionError::Storage)?;
        tracing::debug!(origin = %self.origin, "session token stored");
        Ok(())
    }

    fn get_token(&self) -> Result<Option<String>, SessionError> {
        let db = self.db.lock().map_err(|_| SessionError::Poisoned)?;
        let session = db
            .get_session(&self.origin)
            .map_err(SessionError::Storage)?;
        Ok(session.map(|s| s.token))
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        let db = self.db.lock().map_err(|_| SessionError::Poisoned)?;
        let existed = db
            .clear_session(&self.origin)
            .map_err(SessionError::Storage)?;
        tracing::debug!(origin = %self.origin, existed, "session token cleared");
        Ok(())
    }

    fn saved_at(&self) -> Result<Option<DateTime<Utc>>, SessionError> {
        let db = self.db.lock().map_err(|_| SessionError::Poisoned)?;
        let session = db
            .get_session(&self.origin)
            .map_err(SessionError::Storage)?;
        Ok(session.map(|s| s.saved_at))
    }
}

/// `scheme://host[:port]` for `url`; paths and queries never split a session.
pub fn origin_key(url: &Url) -> String {
    url.origin().ascii_serialization()
}
