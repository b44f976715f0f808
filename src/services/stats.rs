//! Usage statistics — login counters and accumulated time.
//!
//! Counters live independently of the session: logging out or toggling
//! demo mode never touches them. Every mutation writes through to the
//! store immediately; there is no batching, and a failed write is logged
//! while the in-memory counters stay authoritative.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::services::session::now_ms;
use crate::store::KvStore;

/// Store key for the persisted stats record.
pub const STATS_KEY: &str = "stats";

/// Persisted counters. All monotonically non-decreasing except through
/// [`StatsTracker::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_logins: u64,
    pub total_attempts: u64,
    /// Cumulative seconds spent in the app.
    pub total_time_spent: u64,
    /// Milliseconds since epoch of the most recent login; `None` before
    /// the first one (and after a reset).
    pub last_login_date: Option<i64>,
}

/// Tracker over a store-backed [`Stats`] record.
pub struct StatsTracker {
    store: Arc<dyn KvStore>,
    inner: Mutex<Stats>,
}

impl StatsTracker {
    /// Create a tracker, restoring any persisted counters. An unreadable
    /// or unparseable record starts the counters at zero.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Arc<Self> {
        let initial = match store.get(STATS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(stats) => stats,
                Err(e) => {
                    tracing::warn!(error = %e, "stats record unparseable; starting at zero");
                    Stats::default()
                }
            },
            Ok(None) => Stats::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stats; starting at zero");
                Stats::default()
            }
        };
        Arc::new(Self { store, inner: Mutex::new(initial) })
    }

    /// Count a login submission (successful or not).
    pub fn record_attempt(&self) {
        self.mutate(|stats| stats.total_attempts += 1);
    }

    /// Count a successful login and stamp its time.
    pub fn record_login(&self) {
        self.record_login_at(now_ms());
    }

    fn record_login_at(&self, now: i64) {
        self.mutate(|stats| {
            stats.total_logins += 1;
            stats.last_login_date = Some(now);
        });
    }

    /// Accumulate time spent in the app.
    pub fn add_time_spent(&self, seconds: u64) {
        self.mutate(|stats| stats.total_time_spent += seconds);
    }

    /// Zero every counter and clear the last-login stamp.
    pub fn reset(&self) {
        self.mutate(|stats| *stats = Stats::default());
    }

    /// Current counters, by value.
    #[must_use]
    pub fn snapshot(&self) -> Stats {
        self.lock_inner().clone()
    }

    #[must_use]
    pub fn total_logins(&self) -> u64 {
        self.lock_inner().total_logins
    }

    #[must_use]
    pub fn total_attempts(&self) -> u64 {
        self.lock_inner().total_attempts
    }

    #[must_use]
    pub fn last_login_date(&self) -> Option<i64> {
        self.lock_inner().last_login_date
    }

    /// Display form of the accumulated time: `"3h 25m"`, or `"12m"` under
    /// an hour.
    #[must_use]
    pub fn format_total_time(&self) -> String {
        let seconds = self.lock_inner().total_time_spent;
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }

    fn mutate(&self, apply: impl FnOnce(&mut Stats)) {
        let mut stats = self.lock_inner();
        apply(&mut stats);
        match serde_json::to_string(&*stats) {
            Ok(raw) => {
                if let Err(e) = self.store.set(STATS_KEY, &raw) {
                    tracing::warn!(error = %e, "failed to persist stats");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize stats"),
        }
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, Stats> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
