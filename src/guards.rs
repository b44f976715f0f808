//! Route model and navigation guards.
//!
//! Guards are pure predicates the navigation layer consults before
//! entering a view. They read session state (including the lazy expiry
//! check) and answer with allow-or-redirect. Performing the navigation,
//! and resuming the original destination after login, is the shell's job.

use crate::services::session::SessionManager;

/// The three reachable views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public landing page with the login form (`/`).
    Landing,
    /// Authenticated profile page (`/profile`).
    Profile,
    /// Authenticated settings page (`/settings`).
    Settings,
}

impl Route {
    /// Parse a path into a route. `None` for unknown paths, which the
    /// resolver redirects to the landing view.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/" => Some(Self::Landing),
            "/profile" => Some(Self::Profile),
            "/settings" => Some(Self::Settings),
            _ => None,
        }
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Profile => "/profile",
            Self::Settings => "/settings",
        }
    }

    /// Whether the route requires an authenticated session.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Profile | Self::Settings)
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Enter the requested view.
    Allow,
    /// Navigate elsewhere instead. `return_to` carries the originally
    /// requested path so navigation can resume after login.
    Redirect { to: Route, return_to: Option<String> },
}

/// Guard for authenticated-only views.
///
/// Passes only when a session exists and survives the expiry check;
/// otherwise redirects to the landing view, remembering where the user
/// was headed.
#[must_use]
pub fn authenticated_guard(session: &SessionManager, requested_path: &str) -> GuardDecision {
    if session.is_authenticated() && session.validate_session() {
        return GuardDecision::Allow;
    }
    GuardDecision::Redirect {
        to: Route::Landing,
        return_to: Some(requested_path.to_owned()),
    }
}

/// Guard for guest-only views: authenticated users land on their profile
/// instead of the login form.
#[must_use]
pub fn guest_guard(session: &SessionManager) -> GuardDecision {
    if session.is_authenticated() {
        return GuardDecision::Redirect { to: Route::Profile, return_to: None };
    }
    GuardDecision::Allow
}

/// Resolve a raw path against the current session state.
///
/// Unknown paths redirect to the landing view without a `return_to` (there
/// is nothing sensible to come back to).
#[must_use]
pub fn resolve(session: &SessionManager, path: &str) -> GuardDecision {
    let Some(route) = Route::parse(path) else {
        return GuardDecision::Redirect { to: Route::Landing, return_to: None };
    };
    if route.requires_auth() {
        authenticated_guard(session, path)
    } else {
        guest_guard(session)
    }
}

#[cfg(test)]
#[path = "guards_test.rs"]
mod tests;
