//! Session management — identity, token, expiry, demo mode.
//!
//! ARCHITECTURE
//! ============
//! The manager owns the authenticated user, bearer token, and absolute
//! expiry timestamp, persists them through the store, and arms a single
//! expiry timer that force-logs-out when the session lapses. The demo-mode
//! flag is persisted independently and survives logout; demo and OAuth
//! sessions are mutually exclusive, so toggling the flag clears any live
//! session.
//!
//! TRADE-OFFS
//! ==========
//! Expiry is enforced twice: proactively by the timer and lazily by
//! `validate_session`. The lazy path covers suspended processes and
//! stale persisted records; the timer covers an idle but running app.
//! Persistence failures are logged and swallowed; in-memory state stays
//! authoritative for the current process.

use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::guards::Route;
use crate::store::KvStore;
use crate::types::User;

/// Store key for the persisted session record.
pub const SESSION_KEY: &str = "session";

/// Store key for the demo-mode flag (literal `"true"` / `"false"`).
pub const DEMO_MODE_KEY: &str = "demo_mode";

/// Session lifetime applied when callers do not override it.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        Err(_) => 0,
    }
}

/// Persisted session shape: `{user, token, expiresAt}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    user: User,
    token: String,
    expires_at: i64,
}

#[derive(Default)]
struct SessionInner {
    user: Option<User>,
    token: Option<String>,
    expires_at: Option<i64>,
    demo_mode: bool,
}

/// Owner of all session state. Always behind an [`Arc`]; the expiry timer
/// holds a handle back to the manager so it can clear state when it fires.
pub struct SessionManager {
    store: Arc<dyn KvStore>,
    inner: Mutex<SessionInner>,
    /// At most one live expiry timer; re-arming aborts the previous one.
    expiry_timer: Mutex<Option<JoinHandle<()>>>,
    nav_tx: UnboundedSender<Route>,
    /// Self-handle upgraded by spawned expiry timers.
    weak_self: Weak<SessionManager>,
}

impl SessionManager {
    /// Create a manager over `store`, emitting navigation intents (forced
    /// logouts) on `nav_tx`.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>, nav_tx: UnboundedSender<Route>) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            store,
            inner: Mutex::new(SessionInner::default()),
            expiry_timer: Mutex::new(None),
            nav_tx,
            weak_self: weak_self.clone(),
        })
    }

    // =========================================================================
    // READ ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock_inner().user.is_some()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.lock_inner().user.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock_inner().token.clone()
    }

    /// Absolute expiry in milliseconds since epoch, when authenticated.
    #[must_use]
    pub fn session_expiry(&self) -> Option<i64> {
        self.lock_inner().expires_at
    }

    #[must_use]
    pub fn is_demo_mode(&self) -> bool {
        self.lock_inner().demo_mode
    }

    // =========================================================================
    // SESSION LIFECYCLE
    // =========================================================================

    /// Install a session for `user`, persist it, and arm the expiry timer.
    pub fn set_session(&self, user: User, token: &str, expires_in: Duration) {
        self.set_session_at(user, token, expires_in, now_ms());
    }

    fn set_session_at(&self, user: User, token: &str, expires_in: Duration, now: i64) {
        let ttl_ms = i64::try_from(expires_in.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now.saturating_add(ttl_ms);

        {
            let mut inner = self.lock_inner();
            inner.user = Some(user.clone());
            inner.token = Some(token.to_owned());
            inner.expires_at = Some(expires_at);
        }

        let record = SessionRecord { user, token: token.to_owned(), expires_at };
        match serde_json::to_string(&record) {
            Ok(raw) => {
                if let Err(e) = self.store.set(SESSION_KEY, &raw) {
                    tracing::warn!(error = %e, "failed to persist session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize session"),
        }

        self.arm_expiry_timer(expires_in);
    }

    /// Reset user/token/expiry and drop the persisted record. Idempotent.
    pub fn clear_session(&self) {
        self.abort_expiry_timer();

        {
            let mut inner = self.lock_inner();
            inner.user = None;
            inner.token = None;
            inner.expires_at = None;
        }

        if let Err(e) = self.store.remove(SESSION_KEY) {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
    }

    /// One-time startup restore of the persisted session and demo flag.
    ///
    /// A valid, unexpired record is restored and its timer re-armed for the
    /// remaining lifetime. Expired or unparseable records are discarded;
    /// corrupt data is never trusted as an authenticated session.
    pub fn load_session(&self) {
        self.load_session_at(now_ms());
    }

    fn load_session_at(&self, now: i64) {
        match self.store.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionRecord>(&raw) {
                Ok(record) if record.expires_at > now => {
                    let remaining = record.expires_at - now;
                    {
                        let mut inner = self.lock_inner();
                        inner.user = Some(record.user);
                        inner.token = Some(record.token);
                        inner.expires_at = Some(record.expires_at);
                    }
                    let delay = Duration::from_millis(u64::try_from(remaining).unwrap_or(0));
                    self.arm_expiry_timer(delay);
                    tracing::info!(remaining_ms = remaining, "session restored");
                }
                Ok(_) => {
                    tracing::info!("persisted session expired; discarding");
                    self.clear_session();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "persisted session unparseable; discarding");
                    self.clear_session();
                }
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "failed to read persisted session"),
        }

        match self.store.get(DEMO_MODE_KEY) {
            Ok(flag) => {
                self.lock_inner().demo_mode = flag.as_deref() == Some("true");
            }
            Err(e) => tracing::warn!(error = %e, "failed to read demo-mode flag"),
        }
    }

    /// Whether an authenticated, unexpired session exists. Clears state as
    /// a side effect when the session is found expired.
    pub fn validate_session(&self) -> bool {
        self.validate_session_at(now_ms())
    }

    fn validate_session_at(&self, now: i64) -> bool {
        let expired = {
            let inner = self.lock_inner();
            if inner.user.is_none() {
                return false;
            }
            match inner.expires_at {
                Some(expires_at) => expires_at < now,
                None => true,
            }
        };
        if expired {
            tracing::info!("session expired on validation; clearing");
            self.clear_session();
            return false;
        }
        true
    }

    /// Extend the current session with a fresh expiry. No-op when
    /// unauthenticated.
    pub fn refresh_session(&self, expires_in: Duration) {
        let (user, token) = {
            let inner = self.lock_inner();
            (inner.user.clone(), inner.token.clone())
        };
        if let (Some(user), Some(token)) = (user, token) {
            self.set_session(user, &token, expires_in);
        }
    }

    // =========================================================================
    // DEMO MODE
    // =========================================================================

    /// Flip the demo flag. A session authenticated under one mode is not
    /// valid under the other, so any live session is cleared and the UI is
    /// sent back to the landing view.
    pub fn toggle_demo_mode(&self) {
        let enabled = {
            let mut inner = self.lock_inner();
            inner.demo_mode = !inner.demo_mode;
            inner.demo_mode
        };
        self.persist_demo_mode(enabled);

        if self.is_authenticated() {
            self.clear_session();
            self.send_nav(Route::Landing);
        }
    }

    /// Set the demo flag without touching the session (used by demo login
    /// itself, which installs a session in the same breath).
    pub fn set_demo_mode(&self, enabled: bool) {
        self.lock_inner().demo_mode = enabled;
        self.persist_demo_mode(enabled);
    }

    fn persist_demo_mode(&self, enabled: bool) {
        let literal = if enabled { "true" } else { "false" };
        if let Err(e) = self.store.set(DEMO_MODE_KEY, literal) {
            tracing::warn!(error = %e, "failed to persist demo-mode flag");
        }
    }

    // =========================================================================
    // EXPIRY TIMER
    // =========================================================================

    fn arm_expiry_timer(&self, delay: Duration) {
        let mut slot = self
            .expiry_timer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        if delay.is_zero() {
            return;
        }
        let Some(manager) = self.weak_self.upgrade() else {
            return;
        };

        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::info!("session expiry timer fired");
            manager.clear_session();
            manager.send_nav(Route::Landing);
        }));
    }

    fn abort_expiry_timer(&self) {
        let mut slot = self
            .expiry_timer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    pub(crate) fn send_nav(&self, route: Route) {
        if self.nav_tx.send(route).is_err() {
            tracing::debug!("navigation channel closed; intent dropped");
        }
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
