//! Session store: the async operations that establish, refresh and end a session.
//!
//! ERROR HANDLING
//! ==============
//! Failure surfaces differently per operation:
//! - `login` and `logout` return a [`SessionError`] carrying a user-facing message.
//! - `check_session` folds every failure into `false` (anonymous).
//! - `fetch_current_user` propagates the [`ApiError`], since its callers already
//!   assume an authenticated context and must react to losing it.
//!
//! Every failure path leaves the session anonymous. An indeterminate session
//! is never reported as authenticated.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;

use super::session::{Session, SessionContext, SessionStatus};
use crate::net::api::{ApiError, AuthApi};
use crate::net::types::{Credentials, User};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const LOGOUT_FAILED_MESSAGE: &str = "Logout failed";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    LoginFailed(String),
    #[error("{0}")]
    LogoutFailed(String),
}

impl SessionError {
    /// The message suitable for showing to the user.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::LoginFailed(message) | Self::LogoutFailed(message) => message,
        }
    }
}

/// Owns the API collaborator and writes settled results into the shared session.
#[derive(Clone)]
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    session: SessionContext,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// The shared session handle, for wiring a guard to the same state.
    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.snapshot()
    }

    #[must_use]
    pub fn identity(&self) -> Option<User> {
        self.session.read(|s| s.identity.clone())
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.read(|s| s.status)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.session.read(|s| s.last_error.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read(Session::is_authenticated)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.read(Session::is_admin)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.session.read(Session::is_loading)
    }

    /// Pure capability check against the current identity.
    #[must_use]
    pub fn has_permission(&self, capability: &str) -> bool {
        self.session.read(|s| s.has_permission(capability))
    }

    /// Sign in with `credentials`, returning the server's optional greeting.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LoginFailed`] with the server's message, or
    /// `"Login failed"` when the server gave none. The session is left anonymous.
    pub async fn login(&self, credentials: &Credentials) -> Result<Option<String>, SessionError> {
        tracing::debug!(username = %credentials.username, "login started");
        self.session.update(Session::begin);

        match self.api.login(credentials).await {
            Ok(response) => {
                tracing::info!(user_id = response.user.id, username = %response.user.username, "session established");
                self.session.update(|s| s.establish(response.user));
                Ok(response.message)
            }
            Err(e) => {
                let message = e.server_message().unwrap_or(LOGIN_FAILED_MESSAGE).to_owned();
                tracing::warn!(error = %e, "login failed");
                self.session.update(|s| s.fail(message.clone()));
                Err(SessionError::LoginFailed(message))
            }
        }
    }

    /// End the session. Local identity is dropped whether or not the server agrees.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LogoutFailed`] if the remote call failed; the
    /// session is anonymous either way.
    pub async fn logout(&self) -> Result<(), SessionError> {
        tracing::debug!("logout started");
        self.session.update(Session::begin);

        match self.api.logout().await {
            Ok(_) => {
                tracing::info!("session ended");
                self.session.update(Session::clear);
                Ok(())
            }
            Err(e) => {
                let message = e.server_message().unwrap_or(LOGOUT_FAILED_MESSAGE).to_owned();
                tracing::warn!(error = %e, "logout failed remotely; clearing local session anyway");
                self.session.update(|s| s.fail(message.clone()));
                Err(SessionError::LogoutFailed(message))
            }
        }
    }

    /// Ask the server whether a session exists. Safe to call repeatedly (e.g. on boot).
    ///
    /// Returns `true` only if the server reports an authenticated user. Transport
    /// failure is reported as `false`, with the error kept in `last_error`.
    pub async fn check_session(&self) -> bool {
        tracing::debug!("session check started");
        self.session.update(Session::begin);

        match self.api.check_session().await {
            Ok(response) => match (response.authenticated, response.user) {
                (true, Some(user)) => {
                    tracing::debug!(user_id = user.id, "session check: authenticated");
                    self.session.update(|s| s.establish(user));
                    true
                }
                (true, None) => {
                    tracing::warn!("session check reported authenticated without a user; treating as anonymous");
                    self.session.update(Session::clear);
                    false
                }
                (false, _) => {
                    tracing::debug!("session check: anonymous");
                    self.session.update(Session::clear);
                    false
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "session check failed; treating as anonymous");
                self.session.update(|s| s.fail(e.to_string()));
                false
            }
        }
    }

    /// Refresh the identity of an already-authenticated session.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] after dropping the identity; the error text
    /// is kept in `last_error`.
    pub async fn fetch_current_user(&self) -> Result<User, ApiError> {
        tracing::debug!("identity refresh started");
        self.session.update(Session::begin);

        match self.api.current_user().await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "identity refreshed");
                self.session.update(|s| s.establish(user.clone()));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "identity refresh failed; dropping identity");
                self.session.update(|s| s.fail(e.to_string()));
                Err(e)
            }
        }
    }
}
