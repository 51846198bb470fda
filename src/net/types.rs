//! Wire DTOs for the wiki auth endpoints.
//!
//! DESIGN
//! ======
//! Field names mirror the backend's JSON (`is_admin`, `permissions.can_*`) so
//! responses deserialize without renames. Every optional or defaulted field is
//! tolerant of absence: older servers omit the `permissions` object entirely.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Explicit capability grants carried inside a user record.
///
/// `read` and `admin` have no flag here; they are derived from the identity
/// itself (see [`crate::state::permission`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_create: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub can_upload: bool,
}

/// An authenticated user as returned by `/auth/login`, `/auth/check` and `/auth/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable numeric user identifier.
    pub id: i64,
    /// Directory login name.
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Preformatted label for UI, e.g. `"Ada Lovelace (ada)"`.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub permissions: Permissions,
    /// ISO-8601 timestamp, passed through untouched.
    #[serde(default)]
    pub created_at: Option<String>,
    /// ISO-8601 timestamp, passed through untouched.
    #[serde(default)]
    pub last_login: Option<String>,
}

impl User {
    /// Best label for display: server-provided display name, else the username.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

fn default_true() -> bool {
    true
}

/// Login form payload. Sent as-is; the server owns validation.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `POST /auth/login` success body.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

/// `GET /auth/check` body. `user` is present only when authenticated.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}

/// `GET /auth/me` success body.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

/// Body of informational endpoints (`/auth/logout`, `/auth/test-ldap`).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body shape used by every endpoint on non-2xx responses.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
