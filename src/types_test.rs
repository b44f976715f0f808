use super::*;

// =============================================================================
// permission_label
// =============================================================================

#[test]
fn label_single_word() {
    assert_eq!(permission_label("email"), "Email");
}

#[test]
fn label_two_words() {
    assert_eq!(permission_label("public_profile"), "Public Profile");
}

#[test]
fn label_three_words() {
    assert_eq!(permission_label("user_posts_read"), "User Posts Read");
}

#[test]
fn label_collapses_double_underscores() {
    assert_eq!(permission_label("user__likes"), "User Likes");
}

#[test]
fn label_empty_scope() {
    assert_eq!(permission_label(""), "");
}

// =============================================================================
// permission_description
// =============================================================================

#[test]
fn description_known_scopes() {
    assert_eq!(permission_description("email"), "Access your email address");
    assert_eq!(
        permission_description("public_profile"),
        "Access your public profile information"
    );
    assert_eq!(
        permission_description("user_likes"),
        "Access your likes and interests"
    );
}

#[test]
fn description_unknown_scope_falls_back() {
    assert_eq!(
        permission_description("user_birthday"),
        "Access additional information"
    );
}

// =============================================================================
// permissions_for_scopes
// =============================================================================

#[test]
fn scopes_map_to_granted_permissions() {
    let scopes = vec!["email".to_owned(), "user_likes".to_owned()];
    let perms = permissions_for_scopes(&scopes);
    assert_eq!(perms.len(), 2);
    assert!(perms.iter().all(|p| p.granted));
    assert_eq!(perms[0].id, "email");
    assert_eq!(perms[1].name, "User Likes");
}

#[test]
fn empty_scopes_yield_no_permissions() {
    assert!(permissions_for_scopes(&[]).is_empty());
}

// =============================================================================
// protected permissions
// =============================================================================

#[test]
fn email_and_public_profile_are_protected() {
    assert!(is_protected_permission("email"));
    assert!(is_protected_permission("public_profile"));
}

#[test]
fn other_scopes_are_not_protected() {
    assert!(!is_protected_permission("user_likes"));
    assert!(!is_protected_permission(""));
}

// =============================================================================
// User serde — camelCase shape is part of the store contract
// =============================================================================

#[test]
fn user_serializes_camel_case() {
    let user = demo_user();
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("firstName").is_some());
    assert!(json.get("lastName").is_some());
    assert!(json.get("first_name").is_none());
}

#[test]
fn user_round_trips_through_json() {
    let user = demo_user();
    let json = serde_json::to_string(&user).unwrap();
    let restored: User = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, user);
}

#[test]
fn user_without_picture_omits_field() {
    let mut user = demo_user();
    user.picture = None;
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("picture").is_none());
}

#[test]
fn user_deserializes_missing_picture_as_none() {
    let json = r#"{
        "id": "u1",
        "email": "a@b.c",
        "name": "A B",
        "firstName": "A",
        "lastName": "B",
        "permissions": []
    }"#;
    let user: User = serde_json::from_str(json).unwrap();
    assert!(user.picture.is_none());
    assert!(user.permissions.is_empty());
}

// =============================================================================
// demo_user fixture
// =============================================================================

#[test]
fn demo_user_has_three_granted_permissions() {
    let user = demo_user();
    assert_eq!(user.permissions.len(), 3);
    assert!(user.permissions.iter().all(|p| p.granted));
}

#[test]
fn demo_user_identity_fields() {
    let user = demo_user();
    assert_eq!(user.id, "demo-user-123");
    assert_eq!(user.email, "demo@example.com");
    assert_eq!(user.name, "Demo User");
}
