//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use clinia::config::{load_config, CliniaConfig, Environment};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("CLINIA_APPLICATION_LOG_LEVEL");
    std::env::remove_var("CLINIA_API_BASE_URL");
    std::env::remove_var("CLINIA_API_TOKEN");
    std::env::remove_var("CLINIA_API_TIMEOUT_SECONDS");
    std::env::remove_var("CLINIA_WORKFLOW_STRICT_EXISTENCE_CHECK");
    std::env::remove_var("CLINIA_LOGGING_LOCAL_ENABLED");
    std::env::remove_var("CLINIA_LOGGING_LOCAL_PATH");
    std::env::remove_var("TEST_CLINIA_TOKEN");
}

fn write_config(toml_content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
environment = "staging"

[application]
log_level = "debug"

[api]
base_url = "https://clinic.example.com"
token = "t-abc123"
timeout_seconds = 15

[workflow]
strict_existence_check = true

[logging]
local_enabled = true
local_path = "/tmp/clinia"
local_rotation = "hourly"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.api.base_url, "https://clinic.example.com");
    assert_eq!(config.api.api_root(), "https://clinic.example.com/api-ia");
    assert_eq!(config.api.timeout_seconds, 15);
    assert_eq!(
        config.api.token.as_ref().unwrap().expose_secret().as_ref(),
        "t-abc123"
    );
    assert!(config.workflow.strict_existence_check);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_path, "/tmp/clinia");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[api]\nbase_url = \"https://clinic.example.com\"\n");
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.api.timeout_seconds, 30);
    assert!(config.api.token.is_none());
    assert!(!config.workflow.strict_existence_check);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution_in_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_CLINIA_TOKEN", "secret-from-env");

    let toml_content = r#"
[api]
base_url = "https://clinic.example.com"
token = "${TEST_CLINIA_TOKEN}"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(
        config.api.token.as_ref().unwrap().expose_secret().as_ref(),
        "secret-from-env"
    );
    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_var_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[api]
base_url = "https://clinic.example.com"
token = "${TEST_CLINIA_TOKEN}"
"#;

    let temp_file = write_config(toml_content);
    let result = load_config(temp_file.path());

    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("TEST_CLINIA_TOKEN"));
}

#[test]
fn test_env_overrides_win_over_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("CLINIA_API_BASE_URL", "https://override.example.com");
    std::env::set_var("CLINIA_API_TIMEOUT_SECONDS", "60");
    std::env::set_var("CLINIA_WORKFLOW_STRICT_EXISTENCE_CHECK", "true");

    let toml_content = r#"
[api]
base_url = "https://clinic.example.com"
timeout_seconds = 15
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.api.base_url, "https://override.example.com");
    assert_eq!(config.api.timeout_seconds, 60);
    assert!(config.workflow.strict_existence_check);
    cleanup_env_vars();
}

#[test]
fn test_from_env_with_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let config = CliniaConfig::from_env().expect("Failed to build config from env");

    assert_eq!(config.api.base_url, "http://localhost:8069");
    assert_eq!(config.api.api_root(), "http://localhost:8069/api-ia");
    assert!(config.api.token.is_none());
    assert!(!config.workflow.strict_existence_check);
}

#[test]
fn test_from_env_with_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("CLINIA_API_BASE_URL", "https://clinic.example.com");
    std::env::set_var("CLINIA_API_TOKEN", "t-456");
    std::env::set_var("CLINIA_APPLICATION_LOG_LEVEL", "warn");

    let config = CliniaConfig::from_env().expect("Failed to build config from env");

    assert_eq!(config.api.base_url, "https://clinic.example.com");
    assert_eq!(config.api.token.as_ref().unwrap().expose_secret().as_ref(), "t-456");
    assert_eq!(config.application.log_level, "warn");
    cleanup_env_vars();
}

#[test]
fn test_empty_token_env_var_means_unauthenticated() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("CLINIA_API_TOKEN", "");

    let config = CliniaConfig::from_env().expect("Failed to build config from env");

    assert!(config.api.token.is_none());
    cleanup_env_vars();
}

#[test]
fn test_invalid_base_url_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[api]\nbase_url = \"not a url\"\n");
    assert!(load_config(temp_file.path()).is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[application]\nlog_level = \"verbose\"\n");
    assert!(load_config(temp_file.path()).is_err());
}

#[test]
fn test_missing_file_rejected() {
    let result = load_config("/nonexistent/clinia.toml");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}
