//! Integration tests for configuration validation

#![allow(clippy::expect_used, clippy::unwrap_used)]

use arith_rpc::config::{
    ClientConfig, LoggingConfig, NetworkConfig, ServerConfig, DEFAULT_PORT, DEFAULT_SERVER_ADDRESS,
};
use std::time::Duration;
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = NetworkConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
}

#[test]
fn test_defaults_match_protocol_constants() {
    let config = NetworkConfig::default();
    assert_eq!(config.server.address, "0.0.0.0:11111");
    assert_eq!(config.server.receive_timeout, Duration::from_secs(10));
    assert_eq!(config.client.address, DEFAULT_SERVER_ADDRESS);
    assert_eq!(config.client.port, DEFAULT_PORT);
    assert_eq!(config.client.response_timeout, Duration::from_secs(5));
}

#[test]
fn test_invalid_server_address() {
    let mut config = NetworkConfig::default();
    config.server.address = "invalid_address".to_string();

    let errors = config.validate();
    assert!(!errors.is_empty(), "Should have validation errors");
    assert!(errors.iter().any(|e| e.contains("Invalid server address")));
}

#[test]
fn test_empty_server_address() {
    let mut config = NetworkConfig::default();
    config.server.address = String::new();

    let errors = config.validate();
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_short_receive_timeout() {
    let mut config = NetworkConfig::default();
    config.server.receive_timeout = Duration::from_millis(50);

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Receive timeout too short")));
}

#[test]
fn test_long_response_timeout() {
    let mut config = NetworkConfig::default();
    config.client.response_timeout = Duration::from_secs(400);

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Response timeout too long")));
}

#[test]
fn test_empty_status_device_path() {
    let mut config = NetworkConfig::default();
    config.server.status_device = Some(String::new());

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Status device path cannot be empty")));
}

#[test]
fn test_invalid_client_address() {
    let mut config = NetworkConfig::default();
    config.client.address = "not-an-ip".to_string();

    let errors = config.validate();
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| e.contains("Invalid client address")));
}

#[test]
fn test_client_address_with_port_is_rejected() {
    // The port is configured separately
    let mut config = NetworkConfig::default();
    config.client.address = "10.0.0.1:11111".to_string();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Invalid client address")));
}

#[test]
fn test_client_address_too_long() {
    let mut config = NetworkConfig::default();
    config.client.address = "2001:db8:0:0:0:0:2:1".to_string();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Client address too long")));
}

#[test]
fn test_zero_client_port() {
    let mut config = NetworkConfig::default();
    config.client.port = 0;

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("port cannot be 0")));
}

#[test]
fn test_empty_app_name() {
    let mut config = NetworkConfig::default();
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .any(|e| e.contains("Application name cannot be empty")));
}

#[test]
fn test_long_app_name() {
    let mut config = NetworkConfig::default();
    config.logging.app_name = "a".repeat(100);

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Application name too long")));
}

#[test]
fn test_log_to_file_without_path() {
    let mut config = NetworkConfig::default();
    config.logging.log_to_file = true;
    config.logging.log_file_path = None;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("log_file_path must be specified")));
}

#[test]
fn test_no_logging_outputs() {
    let mut config = NetworkConfig::default();
    config.logging.log_to_console = false;
    config.logging.log_to_file = false;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("At least one logging output")));
}

#[test]
fn test_validate_strict_with_valid_config() {
    let config = NetworkConfig::default();
    assert!(config.validate_strict().is_ok());
}

#[test]
fn test_validate_strict_with_invalid_config() {
    let mut config = NetworkConfig::default();
    config.server.address = String::new();

    let result = config.validate_strict();
    assert!(result.is_err());

    if let Err(e) = result {
        let error_str = e.to_string();
        assert!(error_str.contains("Configuration validation failed"));
        assert_eq!(e.status_code(), -110);
    }
}

#[test]
fn test_multiple_validation_errors() {
    let mut config = NetworkConfig::default();

    config.server.address = String::new();
    config.client.address = String::new();
    config.client.port = 0;
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(
        errors.len() >= 4,
        "Expected at least 4 errors, got {}: {:?}",
        errors.len(),
        errors
    );
}

#[test]
fn test_toml_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arith.toml");

    let config = NetworkConfig::default_with_overrides(|c| {
        c.server.address = "127.0.0.1:4000".to_string();
        c.server.status_device = Some("/dev/null".to_string());
        c.client.response_timeout = Duration::from_millis(750);
        c.logging.log_level = Level::DEBUG;
    });
    config.save_to_file(&path).unwrap();

    let loaded = NetworkConfig::from_file(&path).unwrap();
    assert_eq!(loaded.server.address, "127.0.0.1:4000");
    assert_eq!(loaded.server.status_device.as_deref(), Some("/dev/null"));
    assert_eq!(loaded.client.response_timeout, Duration::from_millis(750));
    assert_eq!(loaded.logging.log_level, Level::DEBUG);
}

#[test]
fn test_partial_toml_uses_section_defaults() {
    let config = NetworkConfig::from_toml(
        r#"
        [client]
        address = "192.168.0.10"
        port = 2000
        response_timeout = 1000
        "#,
    )
    .unwrap();

    assert_eq!(config.client.address, "192.168.0.10");
    assert_eq!(config.client.port, 2000);
    assert_eq!(config.server.address, ServerConfig::default().address);
    assert!(config.validate().is_empty());
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = NetworkConfig::from_toml("server = 3").unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
fn test_example_config_parses() {
    let example = NetworkConfig::example_config();
    let parsed = NetworkConfig::from_toml(&example).unwrap();
    assert_eq!(parsed.client.port, DEFAULT_PORT);
}

#[test]
fn test_env_overrides() {
    std::env::set_var("ARITH_RPC_PORT", "2222");
    std::env::set_var("ARITH_RPC_RESPONSE_TIMEOUT_MS", "250");
    let config = NetworkConfig::from_env().unwrap();
    std::env::remove_var("ARITH_RPC_PORT");
    std::env::remove_var("ARITH_RPC_RESPONSE_TIMEOUT_MS");

    assert_eq!(config.client.port, 2222);
    assert_eq!(config.client.response_timeout, Duration::from_millis(250));
}

#[test]
fn test_valid_lab_config() {
    let config = NetworkConfig {
        server: ServerConfig {
            address: "0.0.0.0:11111".to_string(),
            receive_timeout: Duration::from_secs(10),
            status_device: Some("/dev/7seg".to_string()),
        },
        client: ClientConfig {
            address: "192.168.0.10".to_string(),
            port: 11111,
            response_timeout: Duration::from_secs(5),
        },
        logging: LoggingConfig {
            app_name: "arith-server".to_string(),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: true,
        },
    };

    let errors = config.validate();
    assert!(errors.is_empty(), "Lab config should be valid, got: {:?}", errors);
}
