use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, params};
use std::path::Path;

/// A token persisted for one API origin.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub origin: String,
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the session database at the given path.
    pub fn open(path: &Path) -> Result<Self, String> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create directory: {e}"))?;
        }

        let conn = Connection::open(path).map_err(|e| format!("failed to open database: {e}"))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| format!("failed to set pragmas: {e}"))?;

        Ok(Database { conn })
    }

    /// In-memory database, for tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self, String> {
        let conn =
            Connection::open_in_memory().map_err(|e| format!("failed to open database: {e}"))?;
        Ok(Database { conn })
    }

    /// Create the sessions table if it doesn't exist. Safe to run on every open.
    pub fn migrate(&self) -> Result<(), String> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS sessions (
                origin   TEXT PRIMARY KEY,
                token    TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );
            ",
            )
            .map_err(|e| format!("migration failed: {e}"))
    }


    /// Store `token` for `origin`, replacing any previous one.
    pub fn set_session(&self, origin: &str, token: &str) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO sessions (origin, token, saved_at) VALUES (?1, ?2, ?3)",
                params![origin, token, Utc::now().to_rfc3339()],
            )
            .map_err(|e| format!("failed to save session: {e}"))?;
        Ok(())
    }

    pub fn get_session(&self, origin: &str) -> Result<Option<StoredSession>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT origin, token, saved_at FROM sessions WHERE origin = ?1")
            .map_err(|e| format!("query error: {e}"))?;

        let mut rows = stmt
            .query_map(params![origin], row_to_session)
            .map_err(|e| format!("query error: {e}"))?;

        match rows.next() {
            Some(Ok(session)) => Ok(Some(session)),
            Some(Err(e)) => Err(format!("query error: {e}")),
            None => Ok(None),
        }
    }

    /// Remove the session for `origin`. Returns whether one existed.
    pub fn clear_session(&self, origin: &str) -> Result<bool, String> {
        let rows_changed = self
            .conn
            .execute("DELETE FROM sessions WHERE origin = ?1", params![origin])
            .map_err(|e| format!("failed to clear session: {e}"))?;
        Ok(rows_changed > 0)
    }
}

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<StoredSession> {
    let saved_str: String = row.get(2)?;
    let saved_at = DateTime::parse_from_rfc3339(&saved_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(StoredSession {
        origin: row.get(0)?,
        token: row.get(1)?,
        saved_at,
    })
}
