//! Auth orchestrator — demo login, provider login, logout.
//!
//! ARCHITECTURE
//! ============
//! The orchestrator sits between UI actions and the session manager /
//! identity provider. Every operation resolves exactly once with a
//! `Result`; nothing is thrown past this boundary, and provider failures
//! are mapped into the fixed error taxonomy the UI renders from.
//!
//! TRADE-OFFS
//! ==========
//! Login is single-flight: an atomic in-flight flag rejects re-entrant
//! attempts instead of trusting the UI to disable its buttons. A pending
//! provider call is still not cancelled by logout or navigation; the
//! flag only prevents a second attempt from starting underneath it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::provider::{IdentityProvider, ProviderError, ProviderProfile};
use crate::services::session::{now_ms, SessionManager};
use crate::services::stats::StatsTracker;
use crate::types::{permissions_for_scopes, User};

/// Errors surfaced by orchestrator operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// User declined or abandoned the provider consent prompt.
    #[error("login cancelled by user")]
    Cancelled,

    /// Provider call failed (unreachable, rejected, or malformed).
    #[error("identity provider error: {0}")]
    ProviderFailed(String),

    /// No provider is configured; OAuth login is disabled.
    #[error("identity provider not configured")]
    ProviderUnavailable,

    /// Credentials form submitted while demo mode is off. The form cannot
    /// authenticate anyone; OAuth is the only real path.
    #[error("password login is not available; use the provider login")]
    OauthRequired,

    /// Provider login attempted while demo mode is active.
    #[error("cannot use provider login in demo mode; disable demo mode first")]
    DemoModeEnabled,

    /// Demo login could not complete.
    #[error("demo login failed: {0}")]
    DemoLoginFailed(String),

    /// The session lapsed.
    #[error("session expired")]
    SessionExpired,

    /// Another login attempt is already running.
    #[error("a login attempt is already in progress")]
    LoginInFlight,

    /// Anything that escaped classification.
    #[error("{0}")]
    Unknown(String),
}

/// User-facing rendering of an [`AuthError`]: a grepable code, a message,
/// and a suggested remedy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub code: &'static str,
    pub message: String,
    pub suggestion: &'static str,
}

/// Map an error into its inline-rendered form. Static lookup; anything
/// unrecognized collapses to `UNKNOWN_ERROR`.
#[must_use]
pub fn handle_error(error: &AuthError) -> ErrorDetails {
    match error {
        AuthError::Cancelled => ErrorDetails {
            code: "OAUTH_CANCELLED",
            message: "Login was cancelled".to_owned(),
            suggestion: "Try logging in again",
        },
        AuthError::ProviderFailed(_) | AuthError::ProviderUnavailable => ErrorDetails {
            code: "OAUTH_FAILED",
            message: "The login provider could not complete the request".to_owned(),
            suggestion: "Refresh the page and try again",
        },
        AuthError::OauthRequired => ErrorDetails {
            code: "OAUTH_REQUIRED",
            message: "Password login is only available in demo mode".to_owned(),
            suggestion: "Use the provider login button, or enable demo mode",
        },
        AuthError::DemoModeEnabled => ErrorDetails {
            code: "DEMO_MODE_ENABLED",
            message: "Provider login is unavailable while demo mode is on".to_owned(),
            suggestion: "Disable demo mode first",
        },
        AuthError::DemoLoginFailed(_) => ErrorDetails {
            code: "DEMO_LOGIN_FAILED",
            message: "Demo login failed".to_owned(),
            suggestion: "Try again",
        },
        AuthError::SessionExpired => ErrorDetails {
            code: "SESSION_EXPIRED",
            message: "Your session has expired".to_owned(),
            suggestion: "Please log in again",
        },
        AuthError::LoginInFlight => ErrorDetails {
            code: "LOGIN_IN_FLIGHT",
            message: "A login attempt is already in progress".to_owned(),
            suggestion: "Wait for the current attempt to finish",
        },
        AuthError::Unknown(message) => ErrorDetails {
            code: "UNKNOWN_ERROR",
            message: message.clone(),
            suggestion: "Please try again",
        },
    }
}

/// A completed login: the authenticated user and their bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub user: User,
    pub token: String,
}

/// Mediator between UI actions and the session/provider layers.
pub struct AuthOrchestrator {
    session: Arc<SessionManager>,
    stats: Arc<StatsTracker>,
    provider: Option<Arc<dyn IdentityProvider>>,
    scopes: Vec<String>,
    session_ttl: Duration,
    demo_login_delay: Duration,
    login_in_flight: AtomicBool,
}

impl AuthOrchestrator {
    #[must_use]
    pub fn new(
        session: Arc<SessionManager>,
        stats: Arc<StatsTracker>,
        provider: Option<Arc<dyn IdentityProvider>>,
        config: &AppConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            session,
            stats,
            provider,
            scopes: config.scopes.clone(),
            session_ttl: config.session_ttl,
            demo_login_delay: config.demo_login_delay,
            login_in_flight: AtomicBool::new(false),
        })
    }

    /// Whether OAuth login is possible at all (a provider is configured).
    #[must_use]
    pub fn provider_available(&self) -> bool {
        self.provider.is_some()
    }

    // =========================================================================
    // LOGIN
    // =========================================================================

    /// Demo login: a fixed local user behind an artificial delay so UI
    /// loading states are exercisable.
    ///
    /// # Errors
    ///
    /// [`AuthError::LoginInFlight`] when another attempt is running.
    pub async fn login_with_demo(&self) -> Result<LoginSession, AuthError> {
        let _flight = self.begin_attempt()?;

        tokio::time::sleep(self.demo_login_delay).await;

        let user = crate::types::demo_user();
        let token = format!("demo_token_{}", now_ms());
        self.session.set_session(user.clone(), &token, self.session_ttl);
        self.session.set_demo_mode(true);
        self.stats.record_login();

        tracing::info!(user = %user.id, "demo login complete");
        Ok(LoginSession { user, token })
    }

    /// Delegated OAuth login through the configured provider.
    ///
    /// Demo mode and OAuth sessions are mutually exclusive: when the demo
    /// flag is set this fails immediately and the provider is never
    /// contacted. Permissions on the resulting user reflect the requested
    /// scope list, not the provider's actual grant (deliberate product
    /// simplification).
    ///
    /// # Errors
    ///
    /// [`AuthError::DemoModeEnabled`], [`AuthError::ProviderUnavailable`],
    /// [`AuthError::Cancelled`], [`AuthError::ProviderFailed`], or
    /// [`AuthError::LoginInFlight`].
    pub async fn login_with_provider(&self) -> Result<LoginSession, AuthError> {
        let _flight = self.begin_attempt()?;

        if self.session.is_demo_mode() {
            return Err(AuthError::DemoModeEnabled);
        }
        let Some(provider) = &self.provider else {
            return Err(AuthError::ProviderUnavailable);
        };

        let grant = provider
            .login(&self.scopes)
            .await
            .map_err(map_provider_error)?;
        let profile = provider
            .fetch_profile(&grant.access_token)
            .await
            .map_err(map_provider_error)?;

        let user = user_from_profile(profile, &self.scopes);
        self.session
            .set_session(user.clone(), &grant.access_token, self.session_ttl);
        self.stats.record_login();

        tracing::info!(user = %user.id, "provider login complete");
        Ok(LoginSession { user, token: grant.access_token })
    }

    /// Email/password form submission. In demo mode this is just demo
    /// login; otherwise it reports that OAuth is the only real path
    /// (informational, not a failure of anything the user did wrong).
    ///
    /// # Errors
    ///
    /// [`AuthError::OauthRequired`] outside demo mode;
    /// [`AuthError::LoginInFlight`] when another attempt is running.
    pub async fn login_with_credentials(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<LoginSession, AuthError> {
        if self.session.is_demo_mode() {
            tracing::debug!(email, "credentials form routed to demo login");
            return self.login_with_demo().await;
        }
        self.stats.record_attempt();
        Err(AuthError::OauthRequired)
    }

    // =========================================================================
    // LOGOUT
    // =========================================================================

    /// End the session. In OAuth mode the provider is told to revoke the
    /// authorization, but the local session is cleared unconditionally:
    /// a failed provider call never leaves the user logged in after they
    /// asked to leave.
    pub async fn logout(&self) {
        if !self.session.is_demo_mode() {
            if let Some(provider) = &self.provider {
                if let Some(token) = self.session.token() {
                    if let Err(e) = provider.logout(&token).await {
                        tracing::warn!(error = %e, "provider logout failed; clearing local session anyway");
                    }
                }
            }
        }
        self.session.clear_session();
        self.session.send_nav(crate::guards::Route::Landing);
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Count the attempt and claim the single-flight slot.
    fn begin_attempt(&self) -> Result<FlightGuard<'_>, AuthError> {
        self.stats.record_attempt();
        if self
            .login_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AuthError::LoginInFlight);
        }
        Ok(FlightGuard { flag: &self.login_in_flight })
    }
}

/// RAII release of the single-flight flag on every exit path.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

fn map_provider_error(error: ProviderError) -> AuthError {
    match error {
        ProviderError::Cancelled => AuthError::Cancelled,
        other => AuthError::ProviderFailed(other.to_string()),
    }
}

/// Build the session user from provider profile fields. Permission entries
/// come from the requested scope list, all marked granted.
fn user_from_profile(profile: ProviderProfile, scopes: &[String]) -> User {
    User {
        id: profile.id,
        email: profile.email.unwrap_or_default(),
        name: profile.name,
        first_name: profile.first_name,
        last_name: profile.last_name,
        picture: profile.picture,
        permissions: permissions_for_scopes(scopes),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
