//! HTTP client for the wiki's `/auth/*` endpoints.
//!
//! DESIGN
//! ======
//! The session store only sees the [`AuthApi`] trait. [`HttpAuthApi`] is the
//! production implementation over `reqwest` with a cookie store, so the
//! server-issued session cookie set by `/auth/login` rides along on later
//! `/auth/check`, `/auth/me` and `/auth/logout` calls.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Response`] carrying the server's
//! `{"error": "..."}` text when the body has one. Transport failures become
//! [`ApiError::Request`]. Retry policy is the caller's concern.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::types::{CheckResponse, Credentials, ErrorBody, LoginResponse, MeResponse, MessageResponse, User};
use crate::config::ClientConfig;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("API request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("API response error: status {status}{}", message_suffix(.message))]
    Response { status: u16, message: Option<String> },

    /// A success body could not be decoded.
    #[error("API response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Human-readable message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Response { message: Some(message), .. } => Some(message),
            _ => None,
        }
    }

    /// `true` when the server explicitly rejected the caller as unauthenticated.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Response { status: 401, .. })
    }
}

// =============================================================================
// AUTH API TRAIT
// =============================================================================

/// Transport-neutral auth API. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login` with the credentials as JSON.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the login is rejected.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// `POST /auth/logout`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the server refuses.
    async fn logout(&self) -> Result<MessageResponse, ApiError>;

    /// `GET /auth/check`. An anonymous caller is a success with `authenticated = false`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport or server failure.
    async fn check_session(&self) -> Result<CheckResponse, ApiError>;

    /// `GET /auth/me`. Requires an established session.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if unauthenticated or the request fails.
    async fn current_user(&self) -> Result<User, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Build a cookie-carrying client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the session cookie is not a valid
    /// header value or the TLS backend fails to initialize.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
            headers.insert(COOKIE, value);
        }
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /auth/test-ldap`: ask the server to probe its directory connection.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the probe fails or the request cannot be sent.
    pub async fn test_ldap_connection(&self) -> Result<Option<String>, ApiError> {
        let body: MessageResponse = self
            .send_json(self.http.post(endpoint(&self.base_url, "/auth/test-ldap")))
            .await?;
        Ok(body.message)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        decode_response(status, &text)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        tracing::debug!(username = %credentials.username, "POST /auth/login");
        self.send_json(
            self.http
                .post(endpoint(&self.base_url, "/auth/login"))
                .json(credentials),
        )
        .await
    }

    async fn logout(&self) -> Result<MessageResponse, ApiError> {
        tracing::debug!("POST /auth/logout");
        self.send_json(self.http.post(endpoint(&self.base_url, "/auth/logout")))
            .await
    }

    async fn check_session(&self) -> Result<CheckResponse, ApiError> {
        tracing::debug!("GET /auth/check");
        self.send_json(self.http.get(endpoint(&self.base_url, "/auth/check")))
            .await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        tracing::debug!("GET /auth/me");
        let body: MeResponse = self
            .send_json(self.http.get(endpoint(&self.base_url, "/auth/me")))
            .await?;
        Ok(body.user)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Map a raw status + body into either the decoded success payload or an error.
fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::Response { status, message: error_message(body) });
    }
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}
