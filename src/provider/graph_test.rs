use super::*;

// =============================================================================
// DeviceLoginResponse parsing
// =============================================================================

#[test]
fn device_login_response_parses() {
    let json = r#"{
        "code": "device-code-1",
        "user_code": "AB12CD",
        "verification_uri": "https://www.example.com/device",
        "expires_in": 420,
        "interval": 5
    }"#;
    let resp: DeviceLoginResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.code, "device-code-1");
    assert_eq!(resp.user_code, "AB12CD");
    assert_eq!(resp.expires_in, 420);
    assert_eq!(resp.interval, Some(5));
}

#[test]
fn device_login_response_interval_optional() {
    let json = r#"{
        "code": "c",
        "user_code": "U",
        "verification_uri": "https://example.com",
        "expires_in": 60
    }"#;
    let resp: DeviceLoginResponse = serde_json::from_str(json).unwrap();
    assert!(resp.interval.is_none());
}

// =============================================================================
// classify_status_response
// =============================================================================

#[test]
fn classify_grant() {
    let body = r#"{"access_token": "user-token-9", "expires_in": 5184000}"#;
    match classify_status_response(body).unwrap() {
        PollOutcome::Granted(grant) => {
            assert_eq!(grant.access_token, "user-token-9");
            assert_eq!(grant.expires_in, Some(5_184_000));
        }
        other => panic!("expected grant, got {other:?}"),
    }
}

#[test]
fn classify_grant_without_expiry() {
    let body = r#"{"access_token": "t"}"#;
    match classify_status_response(body).unwrap() {
        PollOutcome::Granted(grant) => assert!(grant.expires_in.is_none()),
        other => panic!("expected grant, got {other:?}"),
    }
}

#[test]
fn classify_authorization_pending() {
    let body = r#"{"error": {"message": "authorization pending", "error_subcode": 1349174}}"#;
    assert!(matches!(
        classify_status_response(body).unwrap(),
        PollOutcome::Pending
    ));
}

#[test]
fn classify_slow_down() {
    let body = r#"{"error": {"message": "polling too frequently", "error_subcode": 1349172}}"#;
    assert!(matches!(
        classify_status_response(body).unwrap(),
        PollOutcome::SlowDown
    ));
}

#[test]
fn classify_expired_code() {
    let body = r#"{"error": {"message": "the code has expired", "error_subcode": 1349152}}"#;
    assert!(matches!(
        classify_status_response(body).unwrap(),
        PollOutcome::Expired
    ));
}

#[test]
fn classify_other_subcode_is_graph_error() {
    let body = r#"{"error": {"message": "app is in development mode", "error_subcode": 33}}"#;
    match classify_status_response(body) {
        Err(ProviderError::Graph { message }) => assert!(message.contains("development mode")),
        other => panic!("expected graph error, got {other:?}"),
    }
}

#[test]
fn classify_missing_subcode_is_graph_error() {
    let body = r#"{"error": {"message": "invalid access token"}}"#;
    assert!(matches!(
        classify_status_response(body),
        Err(ProviderError::Graph { .. })
    ));
}

#[test]
fn classify_garbage_is_parse_error() {
    assert!(matches!(
        classify_status_response("<html>oops</html>"),
        Err(ProviderError::ApiParse(_))
    ));
}

// =============================================================================
// GraphProfile → ProviderProfile mapping
// =============================================================================

#[test]
fn profile_maps_nested_picture_url() {
    let json = r#"{
        "id": "10201234",
        "email": "casey@example.com",
        "name": "Casey Fields",
        "first_name": "Casey",
        "last_name": "Fields",
        "picture": {"data": {"url": "https://cdn.example.com/p/150.jpg"}}
    }"#;
    let wire: GraphProfile = serde_json::from_str(json).unwrap();
    let profile = ProviderProfile::from(wire);
    assert_eq!(profile.id, "10201234");
    assert_eq!(profile.email.as_deref(), Some("casey@example.com"));
    assert_eq!(profile.picture.as_deref(), Some("https://cdn.example.com/p/150.jpg"));
}

#[test]
fn profile_email_and_picture_optional() {
    let json = r#"{
        "id": "42",
        "name": "No Email",
        "first_name": "No",
        "last_name": "Email"
    }"#;
    let wire: GraphProfile = serde_json::from_str(json).unwrap();
    let profile = ProviderProfile::from(wire);
    assert!(profile.email.is_none());
    assert!(profile.picture.is_none());
}

// =============================================================================
// GraphProvider construction
// =============================================================================

fn test_oauth() -> crate::config::OauthConfig {
    crate::config::OauthConfig {
        app_id: "app1".to_owned(),
        client_token: "ct2".to_owned(),
        api_version: "v19.0".to_owned(),
    }
}

#[test]
fn provider_builds_endpoints_with_version() {
    let provider = GraphProvider::new(&test_oauth()).unwrap();
    assert_eq!(provider.endpoint("me"), "https://graph.facebook.com/v19.0/me");
    assert_eq!(
        provider.endpoint("device/login"),
        "https://graph.facebook.com/v19.0/device/login"
    );
}

#[test]
fn provider_strips_trailing_base_url_slash() {
    let provider = GraphProvider::with_base_url(&test_oauth(), "http://localhost:9000/").unwrap();
    assert_eq!(provider.endpoint("me"), "http://localhost:9000/v19.0/me");
}

#[test]
fn app_access_token_is_pipe_joined() {
    let provider = GraphProvider::new(&test_oauth()).unwrap();
    assert_eq!(provider.app_access_token(), "app1|ct2");
}

// =============================================================================
// parse_graph_error
// =============================================================================

#[test]
fn graph_error_parses_message() {
    let detail = parse_graph_error(r#"{"error": {"message": "bad token", "error_subcode": 463}}"#);
    assert_eq!(detail.unwrap().message, "bad token");
}

#[test]
fn graph_error_none_for_success_body() {
    assert!(parse_graph_error(r#"{"access_token": "t"}"#).is_none());
}
