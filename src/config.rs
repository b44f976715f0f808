//! Application configuration parsed from environment variables.
//!
//! Provider credentials are optional: when `GRAPH_APP_ID` or
//! `GRAPH_CLIENT_TOKEN` is missing, OAuth login is disabled and the app
//! runs demo-only. Everything else falls back to a default.

use std::time::Duration;

/// Graph API version used when `GRAPH_API_VERSION` is unset.
pub const DEFAULT_API_VERSION: &str = "v19.0";

/// Requested OAuth scopes when `GRAPH_SCOPES` is unset.
pub const DEFAULT_SCOPES: &str = "email,public_profile,user_likes";

/// Session lifetime when `SESSION_TTL_SECS` is unset.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Artificial demo-login latency when `DEMO_LOGIN_DELAY_MS` is unset.
///
/// The original flow stacked a 1000ms fake API call on an 800ms settle
/// delay; this keeps the combined feel.
pub const DEFAULT_DEMO_LOGIN_DELAY_MS: u64 = 1800;

/// Identity-provider credentials.
#[derive(Debug, Clone)]
pub struct OauthConfig {
    /// Provider application identifier.
    pub app_id: String,
    /// App client token used for device-login calls.
    pub client_token: String,
    /// Graph API version string, e.g. `"v19.0"`.
    pub api_version: String,
}

impl OauthConfig {
    /// Load from `GRAPH_APP_ID`, `GRAPH_CLIENT_TOKEN`, `GRAPH_API_VERSION`.
    /// Returns `None` if either credential is missing (OAuth login will be
    /// disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let app_id = std::env::var("GRAPH_APP_ID").ok()?;
        let client_token = std::env::var("GRAPH_CLIENT_TOKEN").ok()?;
        let api_version =
            std::env::var("GRAPH_API_VERSION").unwrap_or_else(|_| DEFAULT_API_VERSION.to_owned());
        Some(Self { app_id, client_token, api_version })
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider credentials; `None` disables OAuth login.
    pub oauth: Option<OauthConfig>,
    /// Ordered list of permission scopes requested at login.
    pub scopes: Vec<String>,
    /// Session lifetime applied by login and refresh.
    pub session_ttl: Duration,
    /// Artificial latency for demo login.
    pub demo_login_delay: Duration,
}

impl AppConfig {
    /// Build the config from environment variables, falling back to
    /// defaults for everything except provider credentials.
    #[must_use]
    pub fn from_env() -> Self {
        let scopes = std::env::var("GRAPH_SCOPES")
            .map(|raw| parse_scopes(&raw))
            .unwrap_or_else(|_| parse_scopes(DEFAULT_SCOPES));
        Self {
            oauth: OauthConfig::from_env(),
            scopes,
            session_ttl: Duration::from_secs(env_parse("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)),
            demo_login_delay: Duration::from_millis(env_parse(
                "DEMO_LOGIN_DELAY_MS",
                DEFAULT_DEMO_LOGIN_DELAY_MS,
            )),
        }
    }
}

impl Default for AppConfig {
    /// Defaults without touching the environment. Demo-only: no provider
    /// credentials.
    fn default() -> Self {
        Self {
            oauth: None,
            scopes: parse_scopes(DEFAULT_SCOPES),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            demo_login_delay: Duration::from_millis(DEFAULT_DEMO_LOGIN_DELAY_MS),
        }
    }
}

/// Split a comma-separated scope list, trimming and dropping empties.
#[must_use]
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|scope| !scope.is_empty())
        .map(str::to_owned)
        .collect()
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
