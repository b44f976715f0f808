use super::*;

use std::sync::Mutex;

// =============================================================================
// OauthConfig::from_env — env manipulation requires unsafe in edition 2024,
// and the GRAPH_* vars are shared process state, so these tests serialize
// on a lock and clear the vars around each case.
// =============================================================================

static GRAPH_ENV_LOCK: Mutex<()> = Mutex::new(());

unsafe fn clear_graph_env() {
    unsafe {
        std::env::remove_var("GRAPH_APP_ID");
        std::env::remove_var("GRAPH_CLIENT_TOKEN");
        std::env::remove_var("GRAPH_API_VERSION");
    }
}

#[test]
fn oauth_from_env_all_set_returns_some() {
    let _guard = GRAPH_ENV_LOCK.lock().unwrap();
    unsafe {
        clear_graph_env();
        std::env::set_var("GRAPH_APP_ID", "app123");
        std::env::set_var("GRAPH_CLIENT_TOKEN", "token456");
        std::env::set_var("GRAPH_API_VERSION", "v20.0");
    }
    let config = OauthConfig::from_env();
    assert!(config.is_some());
    let config = config.unwrap();
    assert_eq!(config.app_id, "app123");
    assert_eq!(config.client_token, "token456");
    assert_eq!(config.api_version, "v20.0");
    unsafe { clear_graph_env() };
}

#[test]
fn oauth_from_env_missing_app_id_returns_none() {
    let _guard = GRAPH_ENV_LOCK.lock().unwrap();
    unsafe {
        clear_graph_env();
        std::env::set_var("GRAPH_CLIENT_TOKEN", "token456");
    }
    assert!(OauthConfig::from_env().is_none());
    unsafe { clear_graph_env() };
}

#[test]
fn oauth_from_env_missing_client_token_returns_none() {
    let _guard = GRAPH_ENV_LOCK.lock().unwrap();
    unsafe {
        clear_graph_env();
        std::env::set_var("GRAPH_APP_ID", "app123");
    }
    assert!(OauthConfig::from_env().is_none());
    unsafe { clear_graph_env() };
}

#[test]
fn oauth_from_env_version_defaults() {
    let _guard = GRAPH_ENV_LOCK.lock().unwrap();
    unsafe {
        clear_graph_env();
        std::env::set_var("GRAPH_APP_ID", "app123");
        std::env::set_var("GRAPH_CLIENT_TOKEN", "token456");
    }
    let config = OauthConfig::from_env().unwrap();
    assert_eq!(config.api_version, DEFAULT_API_VERSION);
    unsafe { clear_graph_env() };
}

// =============================================================================
// parse_scopes
// =============================================================================

#[test]
fn parse_scopes_default_list() {
    let scopes = parse_scopes(DEFAULT_SCOPES);
    assert_eq!(scopes, vec!["email", "public_profile", "user_likes"]);
}

#[test]
fn parse_scopes_trims_whitespace() {
    let scopes = parse_scopes(" email , public_profile ");
    assert_eq!(scopes, vec!["email", "public_profile"]);
}

#[test]
fn parse_scopes_drops_empty_segments() {
    let scopes = parse_scopes("email,,public_profile,");
    assert_eq!(scopes, vec!["email", "public_profile"]);
}

#[test]
fn parse_scopes_empty_string() {
    assert!(parse_scopes("").is_empty());
}

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_unset_returns_default() {
    assert_eq!(env_parse("__SIGNON_TEST_UNSET_77__", 42u64), 42);
}

#[test]
fn env_parse_valid_value() {
    let key = "__SIGNON_TEST_EP_VALID__";
    unsafe { std::env::set_var(key, "120") };
    assert_eq!(env_parse(key, 0u64), 120);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_garbage_returns_default() {
    let key = "__SIGNON_TEST_EP_GARBAGE__";
    unsafe { std::env::set_var(key, "not-a-number") };
    assert_eq!(env_parse(key, 7u64), 7);
    unsafe { std::env::remove_var(key) };
}

// =============================================================================
// AppConfig::default
// =============================================================================

#[test]
fn default_config_is_demo_only() {
    let config = AppConfig::default();
    assert!(config.oauth.is_none());
    assert_eq!(config.scopes.len(), 3);
    assert_eq!(config.session_ttl.as_secs(), DEFAULT_SESSION_TTL_SECS);
    assert_eq!(
        config.demo_login_delay.as_millis(),
        u128::from(DEFAULT_DEMO_LOGIN_DELAY_MS)
    );
}
