//! Domain services behind the UI layer.
//!
//! ARCHITECTURE
//! ============
//! Service modules own session, authentication, profile, and statistics
//! logic so the presentation layer stays a pure consumer: it reads state
//! through accessors and forwards actions, never touching fields directly.

pub mod auth;
pub mod profile;
pub mod session;
pub mod stats;
