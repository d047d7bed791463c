//! Configuration schema types
//!
//! This module defines the configuration structure for Clinia. The root
//! [`CliniaConfig`] maps to the TOML file; every section also has an
//! environment-only path with documented defaults (see the loader).

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main Clinia configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliniaConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Remote clinic-management API connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Workflow policy settings
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliniaConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL of the clinic-management server
    ///
    /// The assistant API lives under `<base_url>/api-ia`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token for the assistant API (optional)
    ///
    /// When absent, requests go out unauthenticated and the remote API may
    /// reject them with 401.
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid api.base_url '{}': {e}", self.base_url))?;
        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Root of the assistant API: configured base URL + `/api-ia`
    pub fn api_root(&self) -> String {
        format!("{}/api-ia", self.base_url.trim_end_matches('/'))
    }
}

/// Workflow policy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkflowConfig {
    /// Strict existence check
    ///
    /// The remote API signals "not found" inconsistently, so the patient
    /// duplicate check is permissive by default: a server error during the
    /// check is treated as "patient absent" and registration proceeds. Set
    /// this to `true` to make a server error during the check abort the
    /// pipeline instead.
    #[serde(default)]
    pub strict_existence_check: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy for local log files (daily, hourly)
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8069".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
