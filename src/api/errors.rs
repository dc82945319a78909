use reqwest::StatusCode;
use serde_json::Value;

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Missing, expired, or rejected credentials (401, or any 4xx from the token endpoint).
    #[error("not authenticated")]
    Auth,
    /// The request was refused with a 4xx carrying a reason.
    #[error("{0}")]
    Validation(String),
    /// A 4xx with no `detail` in its body.
    #[error("request rejected ({status})")]
    Rejected { status: u16 },
    /// The task no longer exists.
    #[error("not found")]
    NotFound,
    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),
    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },
    /// A 2xx response whose body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success status and its body onto the error taxonomy.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Auth,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            s if s.is_client_error() => match extract_detail(body) {
                Some(detail) => ApiError::Validation(detail),
                None => ApiError::Rejected { status: s.as_u16() },
            },
            s => ApiError::Server {
                status: s.as_u16(),
                detail: extract_detail(body).unwrap_or_else(|| status_line(s)),
            },
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Pull a human-readable reason out of an error body.
///
/// Understands `{"detail": "..."}` and the list form
/// `{"detail": [{"msg": "..."}, ...]}` used for request validation failures.
/// Anything else, including HTML error pages from a proxy, has no detail.
pub fn extract_detail(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body.trim()).ok()?;
    match json.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {reason}", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}
