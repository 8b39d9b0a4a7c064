// Unit tests for ClientConfig loading and validation

use crate::DEFAULT_HOST;
use crate::config::{ClientConfig, HOST_ENV_VAR};
use crate::error::ConfigError;

use std::env;

use serial_test::serial;
use tempfile::TempDir;

#[test]
fn given_default_config_then_uses_build_default_host() {
    let config = ClientConfig::default();

    assert_eq!(config.host, DEFAULT_HOST);
    assert!(config.validate().is_ok());
}

/// **VALUE**: Verifies hosts without an http(s) scheme are rejected up front.
///
/// **WHY THIS MATTERS**: A bare `api.opendsm.tk` would otherwise fail later with an opaque
/// URL parse error on the first request.
#[test]
fn given_invalid_hosts_when_validated_then_returns_validation_error() {
    for host in ["", "   ", "api.opendsm.tk", "ftp://api.opendsm.tk", "http://"] {
        let result = ClientConfig::new(host).validate();

        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "{host:?} should be rejected"
        );
    }
}

#[test]
fn given_missing_config_file_when_loaded_then_returns_defaults() {
    let dir = TempDir::new().unwrap();

    let config = ClientConfig::load(dir.path()).unwrap();

    assert_eq!(config, ClientConfig::default());
}

#[test]
fn given_config_file_when_loaded_then_reads_host() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("opendsm.json"),
        r#"{"host":"https://staging.opendsm.tk"}"#,
    )
    .unwrap();

    let config = ClientConfig::load(dir.path()).unwrap();

    assert_eq!(config.host, "https://staging.opendsm.tk");
}

#[test]
fn given_corrupted_config_file_when_loaded_then_returns_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("opendsm.json"), "{ not json").unwrap();

    let result = ClientConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
#[serial]
fn given_host_env_var_when_from_env_then_uses_it() {
    // SAFETY: serialized with every other test touching the environment
    unsafe { env::set_var(HOST_ENV_VAR, "https://env.opendsm.tk") };

    let config = ClientConfig::from_env();

    unsafe { env::remove_var(HOST_ENV_VAR) };
    assert_eq!(config.unwrap().host, "https://env.opendsm.tk");
}

#[test]
#[serial]
fn given_invalid_host_env_var_when_from_env_then_fails() {
    // SAFETY: serialized with every other test touching the environment
    unsafe { env::set_var(HOST_ENV_VAR, "opendsm") };

    let result = ClientConfig::from_env();

    unsafe { env::remove_var(HOST_ENV_VAR) };
    assert!(result.is_err());
}
