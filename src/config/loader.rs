//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Two entry points:
//!
//! - [`load_config`] reads a TOML file, substitutes `${VAR}` placeholders,
//!   applies `CLINIA_*` environment overrides, and validates the result.
//! - [`from_env`] builds a configuration from the environment alone, with
//!   documented defaults; this is the path the conversational host uses when
//!   no config file is deployed.

use super::schema::CliniaConfig;
use super::secret::secret_string;
use crate::domain::errors::CliniaError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CliniaConfig`]
/// 4. Applies environment variable overrides (`CLINIA_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use clinia::config::load_config;
///
/// let config = load_config("clinia.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CliniaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CliniaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CliniaError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CliniaConfig = toml::from_str(&contents)
        .map_err(|e| CliniaError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| CliniaError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Builds a configuration from the environment alone
///
/// Reads a `.env` file when present (via `dotenvy`), then the `CLINIA_*`
/// variables. Everything is optional:
///
/// - `CLINIA_API_BASE_URL` (default `http://localhost:8069`)
/// - `CLINIA_API_TOKEN` (default: unauthenticated)
/// - `CLINIA_API_TIMEOUT_SECONDS` (default 30)
/// - `CLINIA_WORKFLOW_STRICT_EXISTENCE_CHECK` (default false)
/// - `CLINIA_APPLICATION_LOG_LEVEL` (default info)
///
/// # Errors
///
/// Returns an error if the resulting configuration fails validation.
pub fn from_env() -> Result<CliniaConfig> {
    dotenvy::dotenv().ok();

    let mut config = CliniaConfig::default();
    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| CliniaError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid substitution regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CliniaError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `CLINIA_*` prefix
fn apply_env_overrides(config: &mut CliniaConfig) {
    if let Ok(val) = std::env::var("CLINIA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("CLINIA_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("CLINIA_API_TOKEN") {
        if !val.is_empty() {
            config.api.token = Some(secret_string(val));
        }
    }
    if let Ok(val) = std::env::var("CLINIA_API_TIMEOUT_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.api.timeout_seconds = seconds;
        }
    }

    if let Ok(val) = std::env::var("CLINIA_WORKFLOW_STRICT_EXISTENCE_CHECK") {
        config.workflow.strict_existence_check = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("CLINIA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CLINIA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
