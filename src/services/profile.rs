//! Profile service — profile edits and permission toggles.
//!
//! Edits operate on the session's current user and persist by
//! re-installing the session with the same token, which also refreshes its
//! expiry (the original flow behaved the same way). `email` and
//! `public_profile` are policy-protected: revoking them is rejected with a
//! structured error rather than silently ignored.

use std::sync::Arc;

use crate::services::session::{SessionManager, DEFAULT_SESSION_TTL};
use crate::types::{is_protected_permission, Permission, User};

/// Errors surfaced by profile operations.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("no user logged in")]
    NotAuthenticated,
    #[error("permission '{0}' cannot be revoked")]
    ProtectedPermission(String),
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub picture: Option<String>,
}

/// Operations on the authenticated user's profile.
pub struct ProfileService {
    session: Arc<SessionManager>,
}

impl ProfileService {
    #[must_use]
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// The authenticated user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// Merge `updates` into the current user and persist.
    ///
    /// # Errors
    ///
    /// [`ProfileError::NotAuthenticated`] when no session exists.
    pub fn update_profile(&self, updates: ProfileUpdate) -> Result<User, ProfileError> {
        let (mut user, token) = self.authenticated_user()?;

        if let Some(email) = updates.email {
            user.email = email;
        }
        if let Some(name) = updates.name {
            user.name = name;
        }
        if let Some(first_name) = updates.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = updates.last_name {
            user.last_name = last_name;
        }
        if let Some(picture) = updates.picture {
            user.picture = Some(picture);
        }

        self.session
            .set_session(user.clone(), &token, DEFAULT_SESSION_TTL);
        Ok(user)
    }

    /// Re-enable a permission. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// [`ProfileError::NotAuthenticated`] when no session exists.
    pub fn grant_permission(&self, permission_id: &str) -> Result<Vec<Permission>, ProfileError> {
        self.set_granted(permission_id, true)
    }

    /// Disable a permission. Protected permissions are rejected; unknown
    /// ids are a no-op.
    ///
    /// # Errors
    ///
    /// [`ProfileError::ProtectedPermission`] for `email`/`public_profile`;
    /// [`ProfileError::NotAuthenticated`] when no session exists.
    pub fn revoke_permission(&self, permission_id: &str) -> Result<Vec<Permission>, ProfileError> {
        if is_protected_permission(permission_id) {
            return Err(ProfileError::ProtectedPermission(permission_id.to_owned()));
        }
        self.set_granted(permission_id, false)
    }

    /// Delete the account: locally this just tears the session down.
    pub fn delete_account(&self) {
        self.session.clear_session();
    }

    fn set_granted(&self, permission_id: &str, granted: bool) -> Result<Vec<Permission>, ProfileError> {
        let (mut user, token) = self.authenticated_user()?;
        for permission in &mut user.permissions {
            if permission.id == permission_id {
                permission.granted = granted;
            }
        }
        let permissions = user.permissions.clone();
        self.session
            .set_session(user, &token, DEFAULT_SESSION_TTL);
        Ok(permissions)
    }

    fn authenticated_user(&self) -> Result<(User, String), ProfileError> {
        let user = self
            .session
            .current_user()
            .ok_or(ProfileError::NotAuthenticated)?;
        let token = self.session.token().ok_or(ProfileError::NotAuthenticated)?;
        Ok((user, token))
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
