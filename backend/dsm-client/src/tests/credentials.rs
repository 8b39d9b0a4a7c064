// Unit tests for Credentials construction and header mapping

use crate::credentials::{
    API_KEY_ENV_VAR, API_KEY_HEADER, AUTH_TOKEN_HEADER, AUTH_USER_HEADER, Credentials,
    TOKEN_ENV_VAR, USERNAME_ENV_VAR,
};
use crate::error::ConfigError;

use std::env;

use serial_test::serial;

fn clear_credential_vars() {
    // SAFETY: only called from #[serial] tests
    unsafe {
        env::remove_var(API_KEY_ENV_VAR);
        env::remove_var(USERNAME_ENV_VAR);
        env::remove_var(TOKEN_ENV_VAR);
    }
}

#[test]
fn given_token_credentials_when_headers_built_then_sends_user_and_token() {
    let credentials = Credentials::user_token("alice", "tok-123");

    let headers = credentials.headers();

    assert_eq!(
        headers,
        vec![(AUTH_USER_HEADER, "alice"), (AUTH_TOKEN_HEADER, "tok-123")]
    );
}

#[test]
fn given_api_key_when_headers_built_then_sends_only_api_key() {
    let credentials = Credentials::api_key("key-abc");

    assert_eq!(credentials.headers(), vec![(API_KEY_HEADER, "key-abc")]);
}

/// **VALUE**: Verifies Debug output of credentials hides the token.
///
/// **WHY THIS MATTERS**: `DsmClient` derives Debug and holds the credentials.
#[test]
fn given_token_credentials_when_debug_formatted_then_token_is_hidden() {
    let credentials = Credentials::user_token("alice", "tok-123");

    let debug = format!("{credentials:?}");

    assert!(debug.contains("alice"));
    assert!(!debug.contains("tok-123"));
}

#[test]
#[serial]
fn given_api_key_and_token_vars_when_from_env_then_api_key_wins() {
    clear_credential_vars();
    // SAFETY: serialized with every other test touching the environment
    unsafe {
        env::set_var(API_KEY_ENV_VAR, "key-abc");
        env::set_var(USERNAME_ENV_VAR, "alice");
        env::set_var(TOKEN_ENV_VAR, "tok-123");
    }

    let credentials = Credentials::from_env();

    clear_credential_vars();
    assert_eq!(credentials.unwrap(), Credentials::api_key("key-abc"));
}

#[test]
#[serial]
fn given_username_and_token_vars_when_from_env_then_returns_user_token() {
    clear_credential_vars();
    // SAFETY: serialized with every other test touching the environment
    unsafe {
        env::set_var(USERNAME_ENV_VAR, "alice");
        env::set_var(TOKEN_ENV_VAR, "tok-123");
    }

    let credentials = Credentials::from_env();

    clear_credential_vars();
    assert_eq!(credentials.unwrap(), Credentials::user_token("alice", "tok-123"));
}

#[test]
#[serial]
fn given_username_without_token_when_from_env_then_reports_missing_token() {
    clear_credential_vars();
    // SAFETY: serialized with every other test touching the environment
    unsafe { env::set_var(USERNAME_ENV_VAR, "alice") };

    let result = Credentials::from_env();

    clear_credential_vars();
    let Err(ConfigError::MissingVariable { name, .. }) = result else {
        panic!("expected MissingVariable");
    };
    assert_eq!(name, TOKEN_ENV_VAR);
}
