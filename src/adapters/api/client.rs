//! HTTP implementation of the API transport
//!
//! Wraps a `reqwest::Client` configured from [`ApiConfig`]: request timeout,
//! optional bearer credential, and the `/api-ia` root. Response handling
//! normalizes the remote API's non-standard error reporting into
//! [`ApiError`]: the authoritative message lives in the body envelope, not in
//! the HTTP status, even for 500s.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

use super::transport::ApiTransport;
use crate::config::{ApiConfig, SecretString};
use crate::domain::envelope::{authoritative_message, ApiResponse, ApiVerb};
use crate::domain::errors::{ApiError, CliniaError};
use crate::domain::result::Result;

/// HTTP client for the clinic-management assistant API
pub struct HttpApiClient {
    /// Root of the assistant API (base URL + `/api-ia`)
    api_root: String,

    /// Underlying HTTP client
    client: Client,

    /// Bearer credential, when configured
    token: Option<SecretString>,
}

impl HttpApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the underlying HTTP client cannot be
    /// built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CliniaError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_root: config.api_root(),
            client,
            token: config.token.clone(),
        })
    }

    /// Root URL this client addresses
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Whether a bearer credential is configured
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn method_for(verb: ApiVerb) -> Method {
        match verb {
            ApiVerb::Read => Method::GET,
            ApiVerb::Create => Method::POST,
            ApiVerb::Update => Method::PUT,
            ApiVerb::Delete => Method::DELETE,
        }
    }

    fn request(&self, verb: ApiVerb, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_root, endpoint);
        let mut request = self.client.request(Self::method_for(verb), url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token.expose_secret().as_ref());
        }
        request
    }

    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
        verb: ApiVerb,
        endpoint: &str,
        request_data: Option<Vec<(String, String)>>,
    ) -> std::result::Result<ApiResponse, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(endpoint = endpoint, error = %e, "API request failed to complete");
            ApiError::Transport { endpoint: endpoint.to_string(), message: e.to_string() }
        })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("json"))
            .unwrap_or(false);

        // 207 means the primary effect succeeded and a secondary effect
        // degraded; the body is decoded best-effort and the caller inspects
        // it for warning content.
        if status == StatusCode::MULTI_STATUS {
            let raw = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&raw).unwrap_or(Value::Object(Default::default()));
            tracing::debug!(endpoint = endpoint, "API answered 207 partial success");
            return Ok(ApiResponse { status: status.as_u16(), body });
        }

        if status.is_success() {
            let body = if is_json {
                let raw = response.text().await.unwrap_or_default();
                serde_json::from_str(&raw).map_err(|e| ApiError::Decode {
                    status_code: status.as_u16(),
                    endpoint: endpoint.to_string(),
                    message: format!("Invalid JSON in response: {e}"),
                })?
            } else {
                Value::String(response.text().await.unwrap_or_default())
            };
            return Ok(ApiResponse { status: status.as_u16(), body });
        }

        // Non-success status. The meaningful message is usually buried in the
        // body envelope, so decode before deciding what to surface.
        let raw = response.text().await.unwrap_or_default();
        let body: Value =
            serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw.clone()));

        let api_message = authoritative_message(&body)
            .or_else(|| {
                let trimmed = raw.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| status_phrase(status));

        tracing::warn!(
            endpoint = endpoint,
            status = status.as_u16(),
            message = %api_message,
            "API returned error status"
        );

        Err(ApiError::Status {
            status_code: status.as_u16(),
            api_message,
            api_response: body,
            endpoint: endpoint.to_string(),
            verb,
            request_data,
        })
    }
}

fn status_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[async_trait]
impl ApiTransport for HttpApiClient {
    async fn execute(
        &self,
        verb: ApiVerb,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> std::result::Result<ApiResponse, ApiError> {
        tracing::debug!(verb = %verb, endpoint = endpoint, field_count = fields.len(), "Executing API call");

        let mut request = self.request(verb, endpoint);
        if !fields.is_empty() {
            // Reads carry fields in the query string; the remote API does not
            // accept a body on reads. Mutations are form-encoded.
            request = if verb.is_read() { request.query(fields) } else { request.form(fields) };
        }

        self.dispatch(request, verb, endpoint, Some(fields.to_vec())).await
    }

    async fn execute_raw(
        &self,
        verb: ApiVerb,
        endpoint: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> std::result::Result<ApiResponse, ApiError> {
        tracing::debug!(verb = %verb, endpoint = endpoint, bytes = body.len(), "Executing raw API call");

        let request = self
            .request(verb, endpoint)
            .header(CONTENT_TYPE, content_type)
            .body(body);

        // Raw payloads are not echoed into the error context
        self.dispatch(request, verb, endpoint, None).await
    }
}
