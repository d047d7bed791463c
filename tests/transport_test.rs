//! Wire-level tests for the HTTP transport
//!
//! Driven against a local mockito server: request encoding (query vs form),
//! authentication headers, and the non-standard response handling (envelope
//! over HTTP status, 207 partial success).

use clinia::adapters::api::{ApiTransport, HttpApiClient};
use clinia::config::{secret_string, ApiConfig};
use clinia::domain::{ApiError, ApiVerb};
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::ServerGuard, token: Option<&str>) -> HttpApiClient {
    let config = ApiConfig {
        base_url: server.url(),
        token: token.map(|t| secret_string(t.to_string())),
        timeout_seconds: 5,
    };
    HttpApiClient::new(&config).unwrap()
}

fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[tokio::test]
async fn reads_carry_fields_as_query_params() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api-ia/user")
        .match_query(Matcher::UrlEncoded("identification".into(), "12345678".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"data": null, "meta": {"status": "success", "message": ""}}).to_string())
        .create_async()
        .await;

    let client = client_for(&server, None);
    let response = client
        .execute(ApiVerb::Read, "/user", &fields(&[("identification", "12345678")]))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn mutations_are_form_encoded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api-ia/user")
        .match_header("content-type", Matcher::Regex("application/x-www-form-urlencoded".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "María".into()),
            Matcher::UrlEncoded("procedense".into(), "768".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"data": {"id": 456}, "meta": {"status": "success", "message": ""}}).to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, None);
    let response = client
        .execute(ApiVerb::Create, "/user", &fields(&[("name", "María"), ("procedense", "768")]))
        .await
        .unwrap();

    assert_eq!(response.body["data"]["id"], json!(456));
    mock.assert_async().await;
}

#[tokio::test]
async fn bearer_header_sent_only_when_token_configured() {
    let mut server = mockito::Server::new_async().await;
    let with_auth = server
        .mock("GET", "/api-ia/test-products")
        .match_header("authorization", "Bearer t-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"data": [], "meta": {"status": "success", "message": ""}}).to_string())
        .create_async()
        .await;

    let client = client_for(&server, Some("t-123"));
    client.execute(ApiVerb::Read, "/test-products", &[]).await.unwrap();
    with_auth.assert_async().await;

    let without_auth = server
        .mock("GET", "/api-ia/test-products")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"data": [], "meta": {"status": "success", "message": ""}}).to_string())
        .create_async()
        .await;

    let client = client_for(&server, None);
    client.execute(ApiVerb::Read, "/test-products", &[]).await.unwrap();
    without_auth.assert_async().await;
}

#[tokio::test]
async fn partial_success_207_is_returned_as_success() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api-ia/product")
        .with_status(207)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": {"id": 890},
                "meta": {"status": "success", "message": "template-category link failed"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, None);
    let response =
        client.execute(ApiVerb::Create, "/product", &fields(&[("name", "X")])).await.unwrap();

    assert!(response.is_partial());
    assert_eq!(response.body["data"]["id"], json!(890));
}

#[tokio::test]
async fn error_status_extracts_envelope_message_over_status_phrase() {
    // The remote API answers HTTP 500 with a success-shaped envelope whose
    // meta.message is the real outcome; the transport must surface it.
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api-ia/user")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [null],
                "meta": {"status": "success", "message": "No se pudo crear al tercero"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, None);
    let error =
        client.execute(ApiVerb::Create, "/user", &fields(&[("name", "X")])).await.unwrap_err();

    match error {
        ApiError::Status { status_code, api_message, verb, endpoint, request_data, .. } => {
            assert_eq!(status_code, 500);
            assert_eq!(api_message, "No se pudo crear al tercero");
            assert_eq!(verb, ApiVerb::Create);
            assert_eq!(endpoint, "/user");
            assert!(request_data.is_some());
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_message_priority_falls_through_message_and_error_keys() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api-ia/automatized")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": "Tabla desconocida"}).to_string())
        .create_async()
        .await;

    let client = client_for(&server, None);
    let error = client.execute(ApiVerb::Read, "/automatized", &[]).await.unwrap_err();

    assert_eq!(error.message(), "Tabla desconocida");
}

#[tokio::test]
async fn error_with_plain_text_body_uses_trimmed_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api-ia/user")
        .with_status(400)
        .with_header("content-type", "text/plain")
        .with_body("  identificación requerida  ")
        .create_async()
        .await;

    let client = client_for(&server, None);
    let error = client.execute(ApiVerb::Read, "/user", &[]).await.unwrap_err();

    assert_eq!(error.message(), "identificación requerida");
}

#[tokio::test]
async fn error_with_empty_body_uses_status_phrase() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api-ia/user")
        .with_status(503)
        .with_body("")
        .create_async()
        .await;

    let client = client_for(&server, None);
    let error = client.execute(ApiVerb::Read, "/user", &[]).await.unwrap_err();

    assert_eq!(error.status_code(), Some(503));
    assert_eq!(error.message(), "Service Unavailable");
}

#[tokio::test]
async fn success_with_non_json_content_type_returns_raw_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api-ia/automatized")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("ok")
        .create_async()
        .await;

    let client = client_for(&server, None);
    let response = client.execute(ApiVerb::Read, "/automatized", &[]).await.unwrap();

    assert_eq!(response.body, json!("ok"));
}

#[tokio::test]
async fn raw_mode_sends_body_verbatim_with_content_type() {
    let mut server = mockito::Server::new_async().await;
    let payload = "identification;name\n12345678;María";
    let mock = server
        .mock("POST", "/api-ia/user")
        .match_header("content-type", "text/csv")
        .match_body(Matcher::Exact(payload.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"data": {"id": 456}, "meta": {"status": "success", "message": ""}}).to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, None);
    let response = client
        .execute_raw(ApiVerb::Create, "/user", payload.as_bytes().to_vec(), "text/csv")
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body["data"]["id"], json!(456));
    mock.assert_async().await;
}

#[tokio::test]
async fn raw_mode_error_carries_no_request_fields() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api-ia/user")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(json!({"message": "Contenido no soportado"}).to_string())
        .create_async()
        .await;

    let client = client_for(&server, None);
    let error = client
        .execute_raw(ApiVerb::Create, "/user", b"opaque bytes".to_vec(), "application/octet-stream")
        .await
        .unwrap_err();

    match error {
        ApiError::Status { api_message, request_data, .. } => {
            assert_eq!(api_message, "Contenido no soportado");
            // Raw payloads are never echoed into the error context
            assert!(request_data.is_none());
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn success_with_undecodable_json_yields_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api-ia/test-products")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not-json{")
        .create_async()
        .await;

    let client = client_for(&server, None);
    let error = client.execute(ApiVerb::Read, "/test-products", &[]).await.unwrap_err();

    match error {
        ApiError::Decode { status_code, endpoint, message } => {
            // A response was received; the failure is the body, not the wire
            assert_eq!(status_code, 200);
            assert_eq!(endpoint, "/test-products");
            assert!(message.contains("Invalid JSON"));
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_yields_transport_error() {
    // Nothing listens on this port
    let config = ApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        token: None,
        timeout_seconds: 2,
    };
    let client = HttpApiClient::new(&config).unwrap();

    let error = client.execute(ApiVerb::Read, "/user", &[]).await.unwrap_err();

    assert!(matches!(error, ApiError::Transport { .. }));
    assert_eq!(error.status_code(), None);
}

#[tokio::test]
async fn delete_verb_maps_to_http_delete() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api-ia/user")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"data": null, "meta": {"status": "success", "message": "Desactivado"}})
                .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, None);
    let response = client
        .execute(ApiVerb::Delete, "/user", &fields(&[("ids", "[101]"), ("state", "inactive")]))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    mock.assert_async().await;
}
