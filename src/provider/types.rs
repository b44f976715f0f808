//! Provider-neutral types shared by the trait and its implementations.

/// Errors produced by identity-provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The user declined consent or let the device code lapse.
    #[error("login cancelled by user")]
    Cancelled,

    /// The HTTP request to the provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider rejected the call with a structured error object.
    #[error("provider error: {message}")]
    Graph { message: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// A successful authorization grant.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    /// Bearer token for subsequent profile calls.
    pub access_token: String,
    /// Provider-reported token lifetime in seconds, when supplied.
    pub expires_in: Option<u64>,
}

/// Profile fields returned by the provider, flattened to the shape the
/// session layer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub id: String,
    /// Absent when the user denied the email scope.
    pub email: Option<String>,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub picture: Option<String>,
}
