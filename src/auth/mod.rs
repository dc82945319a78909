//! Login, signup, and logout flows.

use crate::api::{ApiError, AuthApi};
use crate::session::{SessionError, SessionStore};

/// Passwords shorter than this are refused before submission. The server has the final say.
pub const MIN_PASSWORD_LEN: usize = 8;

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials and try again.";
pub const SIGNUP_FAILED: &str = "Signup failed";
pub const NETWORK_FAILED: &str = "Network error. Please try again.";
pub const SIGNUP_NOTICE: &str = "Account created! Please login.";

/// Where the user should land next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login { notice: Option<String> },
    Tasks,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Invalid(String),
    /// The message to show under the form.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Session(String),
}

impl From<SessionError> for FormError {
    fn from(e: SessionError) -> Self {
        FormError::Session(e.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(FormError::Invalid(format!(
                "invalid email address: {}",
                self.email.trim()
            )));
        }
        require("password", &self.password)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::Invalid(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Invalid(format!("{field} is required")));
    }
    Ok(())
}

/// Exchange credentials for a token and store it.
///
/// Every failure yields the same message so the form never reveals whether
/// an account exists. The session is only written on success.
pub async fn submit_login<A: AuthApi>(
    api: &A,
    session: &dyn SessionStore,
    form: &LoginForm,
) -> Result<Route, FormError> {
    form.validate()?;
    let token = match api.login(form.email.trim(), &form.password).await {
        Ok(resp) if !resp.access_token.is_empty() => resp.access_token,
        Ok(_) => {
            tracing::warn!("login response carried an empty token");
            return Err(FormError::Rejected(LOGIN_FAILED.to_string()));
        }
        Err(e) => {
            tracing::info!("login failed: {e}");
            return Err(FormError::Rejected(LOGIN_FAILED.to_string()));
        }
    };
    session.set_token(&token)?;
    tracing::info!("logged in");
    Ok(Route::Tasks)
}

/// Register an account, then send the user to the login form.
pub async fn submit_signup<A: AuthApi>(api: &A, form: &SignupForm) -> Result<Route, FormError> {
    form.validate()?;
    match api
        .signup(form.email.trim(), form.name.trim(), &form.password)
        .await
    {
        Ok(()) => Ok(Route::Login {
            notice: Some(SIGNUP_NOTICE.to_string()),
        }),
        Err(ApiError::Validation(detail)) => Err(FormError::Rejected(detail)),
        Err(ApiError::Network(e)) => {
            tracing::info!("signup request failed: {e}");
            Err(FormError::Rejected(NETWORK_FAILED.to_string()))
        }
        Err(e) => {
            tracing::info!("signup rejected: {e}");
            Err(FormError::Rejected(SIGNUP_FAILED.to_string()))
        }
    }
}

/// Forget the stored token.
pub fn logout(session: &dyn SessionStore) -> Result<Route, SessionError> {
    session.clear_token()?;
    tracing::info!("logged out");
    Ok(Route::Login { notice: None })
}
