//! Tests for pagination module

use super::*;
use crate::auth::Credential;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::types::{Method, StringMap};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn items(count: usize, offset: usize) -> Vec<Value> {
    (offset..offset + count).map(|id| json!({"id": id})).collect()
}

fn test_client(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .retry_delay(Duration::ZERO)
        .build();
    HttpClient::new(config, Credential::new("42", "test-token").unwrap()).unwrap()
}

async fn mount_page(server: &MockServer, page: &str, limit: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/servers"))
        .and(query_param("o", "42"))
        .and(query_param("page", page))
        .and(query_param("limit", limit))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn requested_pages(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|req| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == PAGE_PARAM)
                .map(|(_, v)| v.into_owned())
        })
        .collect()
}

// ============================================================================
// PageState Tests
// ============================================================================

#[test]
fn test_page_state_fills_defaults() {
    let mut query = StringMap::new();
    let state = PageState::from_query(&mut query).unwrap();

    assert_eq!(state.limit(), 500);
    assert_eq!(state.page(), 0);
    assert_eq!(query.get(LIMIT_PARAM), Some(&"500".to_string()));
    assert_eq!(query.get(PAGE_PARAM), Some(&"0".to_string()));
}

#[test]
fn test_page_state_keeps_caller_values() {
    let mut query = StringMap::new();
    query.insert(LIMIT_PARAM.to_string(), "25".to_string());
    query.insert(PAGE_PARAM.to_string(), "3".to_string());

    let state = PageState::from_query(&mut query).unwrap();
    assert_eq!(state.limit(), 25);
    assert_eq!(state.page(), 3);
}

#[test]
fn test_page_state_rejects_bad_values() {
    let mut query = StringMap::new();
    query.insert(LIMIT_PARAM.to_string(), "lots".to_string());
    assert!(matches!(
        PageState::from_query(&mut query),
        Err(Error::InvalidConfigValue { .. })
    ));

    let mut query = StringMap::new();
    query.insert(LIMIT_PARAM.to_string(), "0".to_string());
    assert!(PageState::from_query(&mut query).is_err());

    let mut query = StringMap::new();
    query.insert(PAGE_PARAM.to_string(), "-1".to_string());
    assert!(PageState::from_query(&mut query).is_err());
}

#[test]
fn test_absorb_first_page_empty_is_no_data() {
    for empty in [None, Some(Value::Null), Some(json!([])), Some(json!({}))] {
        let mut state = PageState::from_query(&mut StringMap::new()).unwrap();
        assert_eq!(state.absorb(empty, 200).unwrap(), PageStep::NoData);
        assert!(state.records().is_empty());
    }
}

#[test]
fn test_absorb_full_then_short_page() {
    let mut query = StringMap::new();
    query.insert(LIMIT_PARAM.to_string(), "2".to_string());
    let mut state = PageState::from_query(&mut query).unwrap();

    assert_eq!(
        state.absorb(Some(json!([1, 2])), 200).unwrap(),
        PageStep::MorePages
    );
    state.advance(&mut query);
    assert_eq!(query.get(PAGE_PARAM), Some(&"1".to_string()));

    assert_eq!(
        state.absorb(Some(json!([3])), 200).unwrap(),
        PageStep::LastPage
    );
    assert_eq!(state.pages_fetched(), 2);
    assert_eq!(state.into_records(), vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn test_absorb_later_empty_page_keeps_records() {
    let mut query = StringMap::new();
    query.insert(LIMIT_PARAM.to_string(), "2".to_string());
    let mut state = PageState::from_query(&mut query).unwrap();

    state.absorb(Some(json!([1, 2])), 200).unwrap();
    state.advance(&mut query);

    assert_eq!(state.absorb(None, 200).unwrap(), PageStep::LastPage);
    assert_eq!(state.records().len(), 2);
}

#[test]
fn test_absorb_rejects_non_array_page() {
    let mut state = PageState::from_query(&mut StringMap::new()).unwrap();
    let err = state
        .absorb(Some(json!({"id": 1})), 200)
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse { status: 200, .. }));
}

// ============================================================================
// Pager Tests
// ============================================================================

#[tokio::test]
async fn test_pager_collects_three_pages() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "0", "500", json!(items(500, 0))).await;
    mount_page(&mock_server, "1", "500", json!(items(500, 500))).await;
    mount_page(&mock_server, "2", "500", json!(items(137, 1000))).await;

    let client = test_client(&mock_server);
    let envelope = client
        .execute_paged(
            Method::GET,
            "/api/servers",
            RequestConfig::new().query("o", "42"),
        )
        .await
        .unwrap();

    let records = envelope.data.unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1137);
    assert_eq!(records[0]["id"], 0);
    assert_eq!(records[1136]["id"], 1136);
    assert_eq!(requested_pages(&mock_server).await, vec!["0", "1", "2"]);
}

#[tokio::test]
async fn test_pager_first_page_empty() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "0", "500", json!([])).await;

    let client = test_client(&mock_server);
    let envelope = client
        .execute_paged(
            Method::GET,
            "/api/servers",
            RequestConfig::new().query("o", "42"),
        )
        .await
        .unwrap();

    assert_eq!(envelope.status, 200);
    assert!(envelope.data.is_none());
    assert_eq!(requested_pages(&mock_server).await, vec!["0"]);
}

#[tokio::test]
async fn test_pager_short_first_page() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "0", "500", json!(items(42, 0))).await;

    let client = test_client(&mock_server);
    let envelope = client
        .execute_paged(
            Method::GET,
            "/api/servers",
            RequestConfig::new().query("o", "42"),
        )
        .await
        .unwrap();

    assert_eq!(envelope.data.unwrap().as_array().unwrap().len(), 42);
    assert_eq!(requested_pages(&mock_server).await, vec!["0"]);
}

#[tokio::test]
async fn test_pager_full_page_then_empty_page() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "0", "3", json!(items(3, 0))).await;
    mount_page(&mock_server, "1", "3", json!([])).await;

    let client = test_client(&mock_server);
    let envelope = client
        .execute_paged(
            Method::GET,
            "/api/servers",
            RequestConfig::new().query("o", "42").query("limit", "3"),
        )
        .await
        .unwrap();

    assert_eq!(envelope.data, Some(json!(items(3, 0))));
    assert_eq!(requested_pages(&mock_server).await, vec!["0", "1"]);
}

#[tokio::test]
async fn test_pager_starts_at_caller_page() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "4", "2", json!(items(2, 8))).await;
    mount_page(&mock_server, "5", "2", json!(items(1, 10))).await;

    let client = test_client(&mock_server);
    let envelope = client
        .execute_paged(
            Method::GET,
            "/api/servers",
            RequestConfig::new()
                .query("o", "42")
                .query("limit", "2")
                .query("page", "4"),
        )
        .await
        .unwrap();

    assert_eq!(envelope.data, Some(json!(items(3, 8))));
}

#[tokio::test]
async fn test_pager_propagates_page_failure() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "0", "2", json!(items(2, 0))).await;

    Mock::given(method("GET"))
        .and(path("/api/servers"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .execute_paged(
            Method::GET,
            "/api/servers",
            RequestConfig::new().query("o", "42").query("limit", "2"),
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_pager_retries_a_single_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(items(5, 0))))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let envelope = client
        .execute_paged(Method::GET, "/api/servers", RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(envelope.data.unwrap().as_array().unwrap().len(), 5);
    assert_eq!(requested_pages(&mock_server).await, vec!["0", "0"]);
}
