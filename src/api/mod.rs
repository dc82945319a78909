//! HTTP client for the task backend.
//!
//! Every operation is exactly one request. Nothing here touches local state
//! except reading the session token.

use std::future::Future;
use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::models::{Completion, Health, Task, TaskFields, TokenResponse, User};
use crate::session::SessionStore;

mod errors;

pub use errors::{ApiError, extract_detail};

/// Task operations the list controller depends on.
pub trait TaskApi {
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, ApiError>> + Send;

    fn create_task(
        &self,
        title: &str,
        description: &str,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn update_task(
        &self,
        id: i64,
        title: &str,
        description: &str,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn toggle_task(
        &self,
        id: i64,
        completed: bool,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn delete_task(&self, id: i64) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Account operations used by the login and signup forms.
pub trait AuthApi {
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<TokenResponse, ApiError>> + Send;

    fn signup(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: Url, session: Arc<dyn SessionStore>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/users/me`.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let resp = self.send(self.authed(Method::GET, "/api/users/me")).await?;
        decode(resp).await
    }

    /// `GET /health`. Sent without credentials.
    pub async fn health(&self) -> Result<Health, ApiError> {
        let resp = self.send(self.anonymous(Method::GET, "/health")).await?;
        decode(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(method = method.as_str(), url = url.as_str(), "request");
        self.http.request(method, url)
    }

    /// Build a request carrying the stored bearer token, if any.
    ///
    /// A missing token still sends the request; the server decides.
    fn authed(&self, method: Method, path: &str) -> RequestBuilder {
        let token = match self.session.get_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("could not read session token: {e}");
                None
            }
        };
        let url = self.url(path);
        tracing::debug!(
            method = method.as_str(),
            url = url.as_str(),
            token = %token_preview(token.as_deref()),
            "request"
        );
        let req = self.http.request(method, url);
        match token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);
        tracing::debug!(status = status.as_u16(), "request failed: {err}");
        Err(err)
    }
}

impl TaskApi for ApiClient {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let resp = self.send(self.authed(Method::GET, "/api/tasks")).await?;
        decode(resp).await
    }

    async fn create_task(&self, title: &str, description: &str) -> Result<Task, ApiError> {
        require_title(title)?;
        let req = self
            .authed(Method::POST, "/api/tasks")
            .json(&TaskFields { title, description });
        decode(self.send(req).await?).await
    }

    async fn update_task(&self, id: i64, title: &str, description: &str) -> Result<Task, ApiError> {
        require_title(title)?;
        let req = self
            .authed(Method::PUT, &format!("/api/tasks/{id}"))
            .json(&TaskFields { title, description });
        decode(self.send(req).await?).await
    }

    async fn toggle_task(&self, id: i64, completed: bool) -> Result<Task, ApiError> {
        let req = self
            .authed(Method::PATCH, &format!("/api/tasks/{id}/complete"))
            .json(&Completion { completed });
        decode(self.send(req).await?).await
    }

    async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.authed(Method::DELETE, &format!("/api/tasks/{id}")))
            .await?;
        Ok(())
    }
}

impl AuthApi for ApiClient {
    /// `POST /api/token` with form-encoded credentials. Never sends a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let req = self
            .anonymous(Method::POST, "/api/token")
            .form(&[("username", email), ("password", password)]);
        let resp = match self.send(req).await {
            Ok(resp) => resp,
            Err(ApiError::Validation(_) | ApiError::Rejected { .. } | ApiError::NotFound) => {
                return Err(ApiError::Auth);
            }
            Err(e) => return Err(e),
        };
        decode(resp).await
    }

    async fn signup(&self, email: &str, name: &str, password: &str) -> Result<(), ApiError> {
        let req = self
            .anonymous(Method::POST, "/api/signup")
            .query(&[("email", email), ("name", name), ("password", password)]);
        self.send(req).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn require_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    Ok(())
}

/// Token prefix for debug logs: at most 20 characters and at most half the token.
fn token_preview(token: Option<&str>) -> String {
    match token {
        Some(t) => {
            let shown = (t.chars().count() / 2).min(20);
            format!("{}...", t.chars().take(shown).collect::<String>())
        }
        None => "None".to_string(),
    }
}
