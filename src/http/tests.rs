//! Tests for the HTTP client module

use super::client::decode_body;
use super::*;
use crate::auth::Credential;
use crate::error::Error;
use crate::types::{BackoffType, Method};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records retry waits instead of sleeping
#[derive(Default)]
struct RecordingDelay {
    attempts: Mutex<Vec<u32>>,
}

impl RecordingDelay {
    fn attempts(&self) -> Vec<u32> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetryDelay for RecordingDelay {
    async fn wait(&self, attempt: u32) {
        self.attempts.lock().unwrap().push(attempt);
    }
}

fn test_client(server: &MockServer) -> (HttpClient, Arc<RecordingDelay>) {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    let credential = Credential::new("42", "test-token").unwrap();
    let delay = Arc::new(RecordingDelay::default());
    let client = HttpClient::new(config, credential)
        .unwrap()
        .with_delay(delay.clone());
    (client, delay)
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 2);
    assert_eq!(config.backoff_type, BackoffType::Constant);
    assert_eq!(config.initial_backoff, Duration::from_secs(5));
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("fleetsync/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://console.example.com/api")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .rate_limit(RateLimiterConfig::per_second(2))
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url,
        Some("https://console.example.com/api".to_string())
    );
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Exponential);
    assert_eq!(config.backoff().delay_for(2), Duration::from_millis(400));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::per_second(2)));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("o", "42")
        .query("limit", "10")
        .json(json!({"key": "value"}))
        .retries(0);

    assert_eq!(config.query.get("o"), Some(&"42".to_string()));
    assert_eq!(config.query.get("limit"), Some(&"10".to_string()));
    assert!(config.body.is_some());
    assert_eq!(config.max_retries, Some(0));
}

// ============================================================================
// Body decoding
// ============================================================================

#[test]
fn test_decode_body_empty_is_no_data() {
    assert_eq!(decode_body(200, "").unwrap(), None);
}

#[test]
fn test_decode_body_json() {
    assert_eq!(decode_body(200, "[1,2]").unwrap(), Some(json!([1, 2])));
    assert_eq!(decode_body(200, "{}").unwrap(), Some(json!({})));
}

#[test]
fn test_decode_body_garbage_is_protocol_violation() {
    let err = decode_body(200, "<html>maintenance</html>").unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse { status: 200, .. }));

    let err = decode_body(200, "   ").unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse { .. }));
}

// ============================================================================
// Request composition
// ============================================================================

#[tokio::test]
async fn test_request_carries_auth_content_type_and_null_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/servers/7"))
        .and(query_param("o", "42"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Content-Type", "application/json"))
        .and(body_string("null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = test_client(&mock_server);
    let envelope = client
        .execute(
            Method::GET,
            "/api/servers/7",
            &RequestConfig::new().query("o", "42"),
        )
        .await
        .unwrap();

    assert_eq!(envelope.status, 200);
    assert_eq!(envelope.data, Some(json!({"id": 7})));
}

#[tokio::test]
async fn test_delete_still_sends_null_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/servers/9"))
        .and(body_string("null"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = test_client(&mock_server);
    let envelope = client
        .execute(Method::DELETE, "/api/servers/9", &RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(envelope, Envelope::new(204, None));
}

#[tokio::test]
async fn test_put_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/servers/3"))
        .and(body_json(json!({"server_group_id": 11})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = test_client(&mock_server);
    client
        .execute(
            Method::PUT,
            "/api/servers/3",
            &RequestConfig::new().json(json!({"server_group_id": 11})),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_absolute_url_bypasses_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url("http://unused.invalid")
        .build();
    let client = HttpClient::new(config, Credential::new("42", "t").unwrap()).unwrap();

    let envelope = client
        .execute(
            Method::GET,
            &format!("{}/other", mock_server.uri()),
            &RequestConfig::new(),
        )
        .await
        .unwrap();
    assert_eq!(envelope.data, Some(json!([])));
}

// ============================================================================
// Response classification
// ============================================================================

#[tokio::test]
async fn test_empty_success_body_is_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let (client, _) = test_client(&mock_server);
    let envelope = client
        .execute(Method::PUT, "/api/servers/1", &RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(envelope.status, 200);
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn test_non_json_success_body_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let (client, delay) = test_client(&mock_server);
    let err = client
        .execute(Method::GET, "/api/servers", &RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnexpectedResponse { status: 200, .. }));
    assert_eq!(request_count(&mock_server).await, 1);
    assert!(delay.attempts().is_empty());
}

#[test_case(429 ; "too many requests")]
#[test_case(500 ; "internal server error")]
#[test_case(502 ; "bad gateway")]
#[test_case(503 ; "service unavailable")]
#[test_case(504 ; "gateway timeout")]
#[tokio::test]
async fn test_retryable_status_exhausts_retries(status: u16) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string("busy"))
        .mount(&mock_server)
        .await;

    let (client, delay) = test_client(&mock_server);
    let err = client
        .execute(Method::GET, "/api/servers", &RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status: got, body } => {
            assert_eq!(got, status);
            assert_eq!(body, "busy");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
    assert_eq!(request_count(&mock_server).await, 3);
    assert_eq!(delay.attempts(), vec![1, 2]);
}

#[test_case(400 ; "bad request")]
#[test_case(401 ; "unauthorized")]
#[test_case(403 ; "forbidden")]
#[test_case(404 ; "not found")]
#[test_case(501 ; "not implemented")]
#[tokio::test]
async fn test_non_retryable_status_fails_immediately(status: u16) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"errors": ["nope"]})))
        .mount(&mock_server)
        .await;

    let (client, delay) = test_client(&mock_server);
    let err = client
        .execute(Method::GET, "/api/servers", &RequestConfig::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(status));
    assert!(err.to_string().contains("nope"));
    assert_eq!(request_count(&mock_server).await, 1);
    assert!(delay.attempts().is_empty());
}

#[tokio::test]
async fn test_retry_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let (client, delay) = test_client(&mock_server);
    let envelope = client
        .execute(Method::GET, "/api/servers", &RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(envelope.data, Some(json!({"ok": true})));
    assert_eq!(request_count(&mock_server).await, 3);
    assert_eq!(delay.attempts(), vec![1, 2]);
}

#[test_case(0, 1 ; "no retries")]
#[test_case(1, 2 ; "one retry")]
#[test_case(4, 5 ; "four retries")]
#[tokio::test]
async fn test_max_retries_override(max_retries: u32, expected_attempts: usize) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let (client, delay) = test_client(&mock_server);
    let err = client
        .execute(
            Method::GET,
            "/api/servers",
            &RequestConfig::new().retries(max_retries),
        )
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(request_count(&mock_server).await, expected_attempts);
    assert_eq!(delay.attempts().len(), max_retries as usize);
}

#[tokio::test]
async fn test_retry_counter_is_per_call() {
    let mock_server = MockServer::start().await;

    // Each call sees two failures before succeeding, which only fits in the
    // retry budget if the counter starts over for every call.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let (client, _) = test_client(&mock_server);
    client
        .execute(Method::GET, "/api/servers", &RequestConfig::new())
        .await
        .unwrap();

    mock_server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    client
        .execute(Method::GET, "/api/servers", &RequestConfig::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_backoff_delay_from_config_actually_waits() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .retry_delay(Duration::from_millis(50))
        .build();
    let client = HttpClient::new(config, Credential::new("42", "t").unwrap()).unwrap();

    let started = std::time::Instant::now();
    client
        .execute(Method::GET, "/api/servers", &RequestConfig::new())
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(50));
}
