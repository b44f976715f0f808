//! Domain types — users, permissions, and the permission catalog.
//!
//! DESIGN
//! ======
//! `User` and `Permission` serialize camelCase because they round-trip
//! through the persisted session record, whose shape is part of the store
//! contract (`firstName`, `lastName`, `expiresAt`). Permissions are derived
//! from the requested OAuth scopes; the catalog below supplies display names
//! and descriptions for the scopes this app asks for.

use serde::{Deserialize, Serialize};

/// Permission ids that can never be revoked through settings.
pub const PROTECTED_PERMISSIONS: [&str; 2] = ["email", "public_profile"];

/// A capability grant attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Scope identifier, e.g. `"email"` or `"user_likes"`.
    pub id: String,
    /// Display name, e.g. `"Public Profile"`.
    pub name: String,
    /// Whether the grant is currently active.
    pub granted: bool,
    /// Human-readable description shown in settings.
    pub description: String,
}

/// The authenticated identity record.
///
/// Created on successful login (demo synthesis or provider profile fetch),
/// mutated only through profile-update and permission-toggle operations,
/// cleared on logout, expiry, or demo-mode toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque provider-assigned identifier.
    pub id: String,
    pub email: String,
    /// Full display name.
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    /// Avatar URL, if the provider supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub permissions: Vec<Permission>,
}

/// Whether a permission id is policy-protected against revocation.
#[must_use]
pub fn is_protected_permission(id: &str) -> bool {
    PROTECTED_PERMISSIONS.contains(&id)
}

/// Title-case a scope id for display: `"public_profile"` → `"Public Profile"`.
#[must_use]
pub fn permission_label(scope: &str) -> String {
    scope
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Description for a known scope; generic fallback for anything else.
#[must_use]
pub fn permission_description(scope: &str) -> &'static str {
    match scope {
        "email" => "Access your email address",
        "public_profile" => "Access your public profile information",
        "user_likes" => "Access your likes and interests",
        _ => "Access additional information",
    }
}

/// Build the permission set for a list of requested scopes.
///
/// Every entry is marked granted: the app assumes the provider granted the
/// full requested list rather than inspecting the actual grant.
#[must_use]
pub fn permissions_for_scopes(scopes: &[String]) -> Vec<Permission> {
    scopes
        .iter()
        .map(|scope| Permission {
            id: scope.clone(),
            name: permission_label(scope),
            granted: true,
            description: permission_description(scope).to_owned(),
        })
        .collect()
}

/// The fixed local user issued by demo-mode login.
#[must_use]
pub fn demo_user() -> User {
    User {
        id: "demo-user-123".to_owned(),
        email: "demo@example.com".to_owned(),
        name: "Demo User".to_owned(),
        first_name: "Demo".to_owned(),
        last_name: "User".to_owned(),
        picture: Some("https://i.pravatar.cc/150?img=68".to_owned()),
        permissions: vec![
            Permission {
                id: "email".to_owned(),
                name: "Email".to_owned(),
                granted: true,
                description: "Access your email address".to_owned(),
            },
            Permission {
                id: "public_profile".to_owned(),
                name: "Public Profile".to_owned(),
                granted: true,
                description: "Access your public profile information".to_owned(),
            },
            Permission {
                id: "user_likes".to_owned(),
                name: "Likes".to_owned(),
                granted: true,
                description: "Access your likes".to_owned(),
            },
        ],
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
