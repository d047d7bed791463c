//! Shared test transport
//!
//! A recording `ApiTransport` that answers from a scripted queue. Workflow
//! tests use it to assert both the outcomes and the exact wire traffic
//! (verbs, endpoints, fields) without a network.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use clinia::adapters::api::ApiTransport;
use clinia::domain::{ApiError, ApiResponse, ApiVerb};

/// One recorded call: verb, endpoint, fields as sent
pub type RecordedCall = (ApiVerb, String, Vec<(String, String)>);

/// Transport that records calls and answers from a scripted queue
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<Vec<Result<ApiResponse, ApiError>>>,
}

impl RecordingTransport {
    /// Script the responses, in the order calls will arrive
    pub fn scripted(responses: Vec<Result<ApiResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(Vec::new()), responses: Mutex::new(responses) })
    }

    /// Calls made so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ApiTransport for RecordingTransport {
    async fn execute(
        &self,
        verb: ApiVerb,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<ApiResponse, ApiError> {
        self.calls.lock().unwrap().push((verb, endpoint.to_string(), fields.to_vec()));
        let mut responses = self.responses.lock().unwrap();
        assert!(!responses.is_empty(), "unexpected call to {endpoint}: no scripted response left");
        responses.remove(0)
    }

    async fn execute_raw(
        &self,
        _verb: ApiVerb,
        _endpoint: &str,
        _body: Vec<u8>,
        _content_type: &str,
    ) -> Result<ApiResponse, ApiError> {
        panic!("raw mode is not exercised by these tests");
    }
}

/// Success envelope body with the given data
pub fn success_body(data: serde_json::Value, message: &str) -> serde_json::Value {
    serde_json::json!({
        "data": data,
        "meta": {"status": "success", "message": message}
    })
}

/// 200 response wrapping a success envelope
pub fn ok_response(data: serde_json::Value, message: &str) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse { status: 200, body: success_body(data, message) })
}
