//! Client configuration parsed from environment variables.

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_HOME_ROUTE: &str = "home";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL '{0}' (expected http:// or https://)")]
    InvalidUrl(String),
    #[error("invalid value for {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, without trailing slash (e.g. `http://wiki.lan/api`).
    pub api_base_url: String,
    /// Route name the guard redirects to on a permission denial.
    pub home_route: String,
    /// Pre-existing session cookie (`name=value`) to send with every request.
    pub session_cookie: Option<String>,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            home_route: DEFAULT_HOME_ROUTE.to_owned(),
            session_cookie: None,
            timeouts: Timeouts::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `WIKI_API_BASE_URL`: default `http://127.0.0.1:5000/api`
    /// - `WIKI_HOME_ROUTE`: default `home`
    /// - `WIKI_SESSION_COOKIE`: unset by default
    /// - `WIKI_REQUEST_TIMEOUT_SECS`: default 30
    /// - `WIKI_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or a timeout is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(
            std::env::var("WIKI_API_BASE_URL")
                .ok()
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;
        let home_route = std::env::var("WIKI_HOME_ROUTE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOME_ROUTE.to_owned());
        let session_cookie = std::env::var("WIKI_SESSION_COOKIE")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("WIKI_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_u64("WIKI_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_base_url, home_route, session_cookie, timeouts })
    }
}

/// Validate and normalize an API base URL (trailing slashes trimmed).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] unless the URL is http(s) with a host part.
pub fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidUrl(raw.to_owned())),
    }
}

fn env_parse_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
