//! API transport trait definition
//!
//! This module defines the [`ApiTransport`] trait that abstracts the wire
//! protocol of the clinic-management API. Workflows depend on this trait, not
//! on the HTTP client, so the fail-fast pipelines can be exercised against a
//! recording mock without a server.

use async_trait::async_trait;

use crate::domain::envelope::{ApiResponse, ApiVerb};
use crate::domain::errors::ApiError;

/// Canonical endpoint paths of the assistant API
///
/// All paths are relative to the configured root plus `/api-ia`.
pub mod endpoints {
    /// Patient record creation/lookup/deactivation
    pub const USER: &str = "/user";
    /// Product creation
    pub const PRODUCT: &str = "/product";
    /// Product variant creation
    pub const PRODUCT_VARIANT: &str = "/product/variant";
    /// Product/template listing
    pub const TEST_PRODUCTS: &str = "/test-products";
    /// Lab test-type creation
    pub const TEST_TYPE: &str = "/test-type";
    /// Table rows by name
    pub const AUTOMATIZED: &str = "/automatized";
}

/// Trait for executing one remote call
///
/// Implementations must honor the encoding contract:
///
/// - read-style calls serialize `fields` as query parameters (the remote API
///   does not accept a body on reads)
/// - mutating calls serialize `fields` as form-encoded key/value pairs
/// - [`execute_raw`](ApiTransport::execute_raw) bypasses field encoding and
///   sends the payload verbatim
///
/// and the status contract:
///
/// - 207 decodes the body best-effort (empty object on decode failure) and is
///   returned as a success; callers inspect it for warning content
/// - any other non-2xx status produces an [`ApiError::Status`] carrying the
///   authoritative message extracted from the envelope
/// - no retries; every failure surfaces immediately
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Execute one call with encoded fields
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response was received, and
    /// [`ApiError::Status`] for non-2xx/207 responses.
    async fn execute(
        &self,
        verb: ApiVerb,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<ApiResponse, ApiError>;

    /// Execute one call with a raw binary payload, bypassing field encoding
    ///
    /// The resulting [`ApiError::Status`], if any, carries no request fields.
    ///
    /// # Errors
    ///
    /// Same contract as [`execute`](ApiTransport::execute).
    async fn execute_raw(
        &self,
        verb: ApiVerb,
        endpoint: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<ApiResponse, ApiError>;
}
