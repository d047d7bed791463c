//! Configuration management for Clinia.
//!
//! TOML-based configuration with environment variable substitution and
//! `CLINIA_*` overrides, plus an env-only path with documented defaults for
//! hosts that deploy without a config file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use clinia::config::CliniaConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // From a file
//! let config = CliniaConfig::from_file("clinia.toml")?;
//!
//! // Or from the environment alone
//! let config = CliniaConfig::from_env()?;
//!
//! println!("API root: {}", config.api.api_root());
//! # Ok(())
//! # }
//! ```
//!
//! # Sections
//!
//! - [`ApplicationConfig`]: log level
//! - [`ApiConfig`]: base URL, bearer token, timeout
//! - [`WorkflowConfig`]: strict vs permissive existence check
//! - [`LoggingConfig`]: local file logging

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{from_env, load_config};
pub use schema::{ApiConfig, ApplicationConfig, CliniaConfig, Environment, LoggingConfig, WorkflowConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};

use crate::domain::result::Result;
use std::path::Path;

impl CliniaConfig {
    /// Load configuration from a TOML file (see [`load_config`])
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        load_config(path)
    }

    /// Build configuration from the environment (see [`from_env`])
    pub fn from_env() -> Result<Self> {
        from_env()
    }
}
