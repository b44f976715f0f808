//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is the explicitly owned container the UI shell holds: store,
//! session manager, stats tracker, and auth orchestrator, wired together
//! once at construction. There are no ambient globals. Everything the
//! presentation layer reads goes through these handles, and forced
//! navigation (session expiry, demo toggle, logout) arrives on the
//! receiver returned by [`AppState::new`].

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::config::AppConfig;
use crate::guards::Route;
use crate::provider::IdentityProvider;
use crate::services::auth::AuthOrchestrator;
use crate::services::profile::ProfileService;
use crate::services::session::SessionManager;
use crate::services::stats::StatsTracker;
use crate::store::KvStore;

/// Everything the shell needs, built once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn KvStore>,
    pub session: Arc<SessionManager>,
    pub stats: Arc<StatsTracker>,
    pub auth: Arc<AuthOrchestrator>,
    pub profile: ProfileService,
}

impl AppState {
    /// Wire the state graph. `provider` is `None` when OAuth is not
    /// configured; provider login then fails fast instead of hanging.
    ///
    /// Returns the state plus the navigation-intent receiver the shell
    /// must drain.
    #[must_use]
    pub fn new(
        config: AppConfig,
        store: Arc<dyn KvStore>,
        provider: Option<Arc<dyn IdentityProvider>>,
    ) -> (Self, UnboundedReceiver<Route>) {
        if provider.is_none() {
            tracing::warn!("no identity provider configured; OAuth login disabled");
        }

        let (nav_tx, nav_rx) = mpsc::unbounded_channel();
        let session = SessionManager::new(Arc::clone(&store), nav_tx);
        let stats = StatsTracker::new(Arc::clone(&store));
        let auth = AuthOrchestrator::new(Arc::clone(&session), Arc::clone(&stats), provider, &config);
        let profile = ProfileService::new(Arc::clone(&session));

        let state = Self { config, store, session, stats, auth, profile };
        (state, nav_rx)
    }

    /// One-time startup step: restore the persisted session and demo flag.
    /// Run exactly once, before the first navigation.
    pub fn initialize(&self) {
        self.session.load_session();
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
