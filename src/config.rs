use std::path::PathBuf;

use reqwest::Url;

/// Backend used when neither `--api-url` nor `TODO_API_URL` is given.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub session_db: PathBuf,
}

impl Config {
    pub fn resolve(api_url: Option<&str>, session_db: Option<PathBuf>) -> Result<Self, String> {
        let api_url = parse_api_url(api_url.unwrap_or(DEFAULT_API_URL))?;
        let session_db = session_db.unwrap_or_else(default_session_db);
        Ok(Config {
            api_url,
            session_db,
        })
    }
}

pub fn parse_api_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| format!("invalid API URL {raw:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported API URL scheme: {other}")),
    }
}

/// `~/.todo/session.db`, or `.todo/session.db` under the working directory without a home.
pub fn default_session_db() -> PathBuf {
    let mut p = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default();
    p.push(".todo");
    p.push("session.db");
    p
}
