//! Graph device-login client.
//!
//! ARCHITECTURE
//! ============
//! A browser SDK would pop a consent dialog; a native client instead uses
//! the provider's device-login flow: request a user code, tell the user
//! where to enter it, and poll `login_status` until the grant lands or the
//! code lapses. Profile fetch and logout are plain Graph calls against the
//! user access token.
//!
//! ERROR HANDLING
//! ==============
//! Poll responses carry structured error subcodes. `authorization_pending`
//! and `slow_down` keep the loop alive; an expired or declined code maps to
//! [`ProviderError::Cancelled`] so the orchestrator reports it the same way
//! the browser SDK reports a dismissed dialog.

use std::time::Duration;

use serde::Deserialize;

use super::types::{AuthGrant, ProviderError, ProviderProfile};
use super::IdentityProvider;
use crate::config::OauthConfig;

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
const PROFILE_FIELDS: &str = "id,email,first_name,last_name,name,picture.width(150)";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const SLOW_DOWN_BACKOFF_SECS: u64 = 5;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// Graph device-login error subcodes.
const SUBCODE_AUTHORIZATION_PENDING: i64 = 1_349_174;
const SUBCODE_SLOW_DOWN: i64 = 1_349_172;
const SUBCODE_CODE_EXPIRED: i64 = 1_349_152;

/// HTTPS implementation of [`IdentityProvider`] against the Graph API.
pub struct GraphProvider {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    client_token: String,
    api_version: String,
}

impl GraphProvider {
    /// Build a provider client from OAuth credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::HttpClientBuild`] when the HTTP client
    /// cannot be constructed.
    pub fn new(oauth: &OauthConfig) -> Result<Self, ProviderError> {
        Self::with_base_url(oauth, DEFAULT_BASE_URL)
    }

    /// Build against a custom base URL (test servers).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::HttpClientBuild`] when the HTTP client
    /// cannot be constructed.
    pub fn with_base_url(oauth: &OauthConfig, base_url: &str) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            app_id: oauth.app_id.clone(),
            client_token: oauth.client_token.clone(),
            api_version: oauth.api_version.clone(),
        })
    }

    /// `app_id|client_token` composite used by device-login endpoints.
    fn app_access_token(&self) -> String {
        format!("{}|{}", self.app_id, self.client_token)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.api_version, path)
    }

    async fn start_device_login(&self, scopes: &[String]) -> Result<DeviceLoginResponse, ProviderError> {
        let resp = self
            .http
            .post(self.endpoint("device/login"))
            .form(&[
                ("access_token", self.app_access_token()),
                ("scope", scopes.join(",")),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::ApiRequest(e.to_string()))?;
        let body = read_body(resp).await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::ApiParse(e.to_string()))
    }

    async fn poll_device_login(&self, code: &str) -> Result<PollOutcome, ProviderError> {
        let resp = self
            .http
            .post(self.endpoint("device/login_status"))
            .form(&[
                ("access_token", self.app_access_token()),
                ("code", code.to_owned()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::ApiRequest(e.to_string()))?;
        // Status errors are carried in the body for this endpoint; classify
        // the payload regardless of HTTP status.
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::ApiRequest(e.to_string()))?;
        classify_status_response(&body)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GraphProvider {
    async fn login(&self, scopes: &[String]) -> Result<AuthGrant, ProviderError> {
        let device = self.start_device_login(scopes).await?;
        tracing::info!(
            uri = %device.verification_uri,
            user_code = %device.user_code,
            "device login started; waiting for user confirmation"
        );

        let deadline = tokio::time::Instant::now() + Duration::from_secs(device.expires_in);
        let mut interval =
            Duration::from_secs(device.interval.unwrap_or(DEFAULT_POLL_INTERVAL_SECS));

        loop {
            tokio::time::sleep(interval).await;
            if tokio::time::Instant::now() >= deadline {
                return Err(ProviderError::Cancelled);
            }
            match self.poll_device_login(&device.code).await? {
                PollOutcome::Granted(grant) => return Ok(grant),
                PollOutcome::Pending => {}
                PollOutcome::SlowDown => {
                    interval += Duration::from_secs(SLOW_DOWN_BACKOFF_SECS);
                }
                PollOutcome::Expired => return Err(ProviderError::Cancelled),
            }
        }
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, ProviderError> {
        let resp = self
            .http
            .get(self.endpoint("me"))
            .query(&[("fields", PROFILE_FIELDS), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| ProviderError::ApiRequest(e.to_string()))?;
        let body = read_body(resp).await?;
        let profile: GraphProfile =
            serde_json::from_str(&body).map_err(|e| ProviderError::ApiParse(e.to_string()))?;
        Ok(profile.into())
    }

    async fn logout(&self, access_token: &str) -> Result<(), ProviderError> {
        let resp = self
            .http
            .delete(self.endpoint("me/permissions"))
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| ProviderError::ApiRequest(e.to_string()))?;
        read_body(resp).await.map(|_| ())
    }
}

/// Read a response body, mapping non-success statuses to the structured
/// Graph error when one is present.
async fn read_body(resp: reqwest::Response) -> Result<String, ProviderError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| ProviderError::ApiRequest(e.to_string()))?;
    if status.is_success() {
        return Ok(body);
    }
    match parse_graph_error(&body) {
        Some(detail) => Err(ProviderError::Graph { message: detail.message }),
        None => Err(ProviderError::ApiResponse { status: status.as_u16(), body }),
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct DeviceLoginResponse {
    code: String,
    user_code: String,
    verification_uri: String,
    expires_in: u64,
    #[serde(default)]
    interval: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DeviceStatusSuccess {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GraphErrorDetail {
    message: String,
    #[serde(default)]
    error_subcode: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GraphProfile {
    id: String,
    #[serde(default)]
    email: Option<String>,
    name: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    picture: Option<GraphPicture>,
}

#[derive(Debug, Deserialize)]
struct GraphPicture {
    data: GraphPictureData,
}

#[derive(Debug, Deserialize)]
struct GraphPictureData {
    url: String,
}

impl From<GraphProfile> for ProviderProfile {
    fn from(profile: GraphProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            name: profile.name,
            first_name: profile.first_name,
            last_name: profile.last_name,
            picture: profile.picture.map(|p| p.data.url),
        }
    }
}

// =============================================================================
// POLL CLASSIFICATION
// =============================================================================

/// One poll of the device-login status endpoint.
#[derive(Debug)]
enum PollOutcome {
    Granted(AuthGrant),
    Pending,
    SlowDown,
    Expired,
}

fn parse_graph_error(body: &str) -> Option<GraphErrorDetail> {
    serde_json::from_str::<GraphErrorBody>(body)
        .map(|parsed| parsed.error)
        .ok()
}

/// Classify a `device/login_status` response body.
fn classify_status_response(body: &str) -> Result<PollOutcome, ProviderError> {
    if let Ok(success) = serde_json::from_str::<DeviceStatusSuccess>(body) {
        return Ok(PollOutcome::Granted(AuthGrant {
            access_token: success.access_token,
            expires_in: success.expires_in,
        }));
    }
    let Some(detail) = parse_graph_error(body) else {
        return Err(ProviderError::ApiParse(format!("unexpected poll response: {body}")));
    };
    match detail.error_subcode {
        Some(SUBCODE_AUTHORIZATION_PENDING) => Ok(PollOutcome::Pending),
        Some(SUBCODE_SLOW_DOWN) => Ok(PollOutcome::SlowDown),
        Some(SUBCODE_CODE_EXPIRED) => Ok(PollOutcome::Expired),
        _ => Err(ProviderError::Graph { message: detail.message }),
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
