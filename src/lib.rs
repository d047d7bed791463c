// Clinia - Conversational clinic-management assistant core
// Copyright (c) 2026 Clinia Contributors
// Licensed under the MIT License

//! # Clinia - Clinic-Management Assistant Core
//!
//! Clinia is the deterministic core of a Spanish-language administrative
//! assistant for a clinic-management platform. It executes named operations
//! against the platform's remote API: registering patients, creating products
//! with optional variants, creating laboratory test types, and reading
//! reference data.
//!
//! The conversational layer (language model, chat host) lives outside this
//! crate. Clinia takes already-extracted operation requests and guarantees
//! the business rules: validation before any network traffic, a fixed origin
//! code on every patient, boolean product flags sent only when true, and
//! remote failures re-expressed as actionable Spanish-language guidance.
//!
//! ## Architecture
//!
//! Clinia follows a layered architecture:
//!
//! - [`core`] - Business logic (workflows, operation dispatch, error classifier)
//! - [`adapters`] - Remote API transport (the mockable seam)
//! - [`domain`] - Core domain types, the response envelope, and errors
//! - [`validation`] - Shared field validators and id extraction
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use clinia::adapters::api::HttpApiClient;
//! use clinia::config::CliniaConfig;
//! use clinia::core::{OperationDispatcher, OperationRequest};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CliniaConfig::from_env()?;
//!     let transport = Arc::new(HttpApiClient::new(&config.api)?);
//!     let dispatcher = OperationDispatcher::new(transport, &config.workflow);
//!
//!     let fields = match json!({
//!         "name": "María",
//!         "lastname": "González",
//!         "identification": "12345678",
//!         "date_of_birth": "1990-03-15",
//!         "gender": "f"
//!     }) {
//!         serde_json::Value::Object(map) => map,
//!         _ => unreachable!(),
//!     };
//!     let request = OperationRequest::new("create-patient", fields);
//!
//!     let result = dispatcher.dispatch(&request).await?;
//!     println!("{}", result.message);
//!     Ok(())
//! }
//! ```
//!
//! ## The Response Envelope
//!
//! The remote API wraps responses in `{data, meta: {status, message}}` and
//! the envelope is authoritative over the HTTP status: an HTTP 500 can carry
//! a success-shaped envelope whose `meta.message` is the real outcome, and
//! HTTP 207 signals partial success. Every layer of this crate that reads a
//! response goes through [`domain::ApiEnvelope`] rather than trusting the
//! status code alone.
//!
//! ## Error Handling
//!
//! Clinia uses the [`domain::CliniaError`] type for all errors:
//!
//! ```rust,no_run
//! use clinia::domain::CliniaError;
//!
//! fn example() -> Result<(), CliniaError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = clinia::config::CliniaConfig::from_file("clinia.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! Remote failures additionally pass through the error classifier
//! ([`core::classify`]), which produces a user-facing message, a correction
//! suggestion, a recoverability flag, and a coarse category. Raw transport
//! text such as `"Internal Server Error"` is never surfaced to callers.
//!
//! ## Logging
//!
//! Clinia uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(operation = "create-patient", "Dispatching operation");
//! warn!(endpoint = "/user", "Existence check degraded; proceeding");
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod validation;
