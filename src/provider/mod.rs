//! Identity provider — the third-party OAuth seam.
//!
//! DESIGN
//! ======
//! The auth orchestrator only sees the [`IdentityProvider`] trait: one
//! login, one profile fetch, one logout, each resolving exactly once. The
//! shipping implementation is [`graph::GraphProvider`], which drives the
//! Graph device-login flow over HTTPS. Tests substitute a scripted mock.
//! When no provider is configured at all, the orchestrator fails fast
//! rather than hanging on an absent SDK.

pub mod graph;
pub mod types;

pub use graph::GraphProvider;
pub use types::{AuthGrant, ProviderError, ProviderProfile};

/// Asynchronous identity-provider surface consumed by the orchestrator.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the interactive login flow for the requested scopes.
    ///
    /// Resolves with an access grant, or [`ProviderError::Cancelled`] when
    /// the user declines or abandons the consent prompt.
    async fn login(&self, scopes: &[String]) -> Result<AuthGrant, ProviderError>;

    /// Fetch the profile fields behind an access token.
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, ProviderError>;

    /// Invalidate the provider-side authorization for an access token.
    async fn logout(&self, access_token: &str) -> Result<(), ProviderError>;
}
