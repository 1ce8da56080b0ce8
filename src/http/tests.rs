//! Transport tests against a local mock server

use super::*;
use crate::auth::AuthConfig;
use crate::error::Error;
use crate::types::{BackoffType, Method};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_with(retries: u32) -> HttpClient {
    let config = HttpClientConfig::builder()
        .max_retries(retries)
        .backoff(BackoffType::Constant, Duration::from_millis(1), Duration::from_millis(1))
        .build();
    HttpClient::with_config(config).unwrap()
}

fn url(server: &MockServer, path: &str) -> String {
    format!("{}/{path}", server.uri())
}

#[test]
fn defaults_retry_twice_with_exponential_backoff() {
    let config = HttpClientConfig::default();
    assert_eq!(
        (config.timeout, config.max_retries, config.backoff_type),
        (Duration::from_secs(30), 2, BackoffType::Exponential)
    );
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert!(config.user_agent.starts_with("spreedly-client/"));
}

#[test]
fn builder_overrides_every_setting() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .max_retries(0)
        .backoff(BackoffType::Linear, Duration::from_millis(50), Duration::from_millis(400))
        .user_agent("billing-sync/2.3")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.max_retries, 0);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(50));
    assert_eq!(config.max_backoff, Duration::from_millis(400));
    assert_eq!(config.user_agent, "billing-sync/2.3");
}

#[test]
fn test_raw_response_success() {
    let ok = RawResponse {
        status: 201,
        body: "<a/>".to_string(),
    };
    assert!(ok.is_success());
    assert_eq!(ok.into_success().unwrap(), "<a/>");

    let rejected = RawResponse {
        status: 422,
        body: "bad".to_string(),
    };
    assert!(!rejected.is_success());
    let err = rejected.into_success().unwrap_err();
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn test_get_returns_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v4/site/subscription_plans.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<plans/>"))
        .mount(&mock_server)
        .await;

    let response = client_with(0)
        .request(
            Method::GET,
            &url(&mock_server, "api/v4/site/subscription_plans.xml"),
            RequestConfig::new(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "<plans/>");
}

#[tokio::test]
async fn test_error_statuses_come_back_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let response = client_with(0)
        .request(Method::GET, &url(&mock_server, "missing.xml"), RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body, "Not Found");
}

#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky.xml"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client_with(3)
        .request(Method::GET, &url(&mock_server, "flaky.xml"), RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(response.status, 500);
}

#[tokio::test]
async fn test_xml_body_is_sent_with_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/subscribers.xml"))
        .and(header("content-type", "application/xml"))
        .and(body_string("<subscriber/>"))
        .respond_with(ResponseTemplate::new(201).set_body_string("<subscriber/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client_with(0)
        .request(
            Method::POST,
            &url(&mock_server, "subscribers.xml"),
            RequestConfig::new().xml("<subscriber/>"),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn test_auth_is_applied() {
    let mock_server = MockServer::start().await;

    // "token:X" in base64
    Mock::given(method("DELETE"))
        .and(path("/subscribers.xml"))
        .and(header("authorization", "Basic dG9rZW46WA=="))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        HttpClient::with_auth(HttpClientConfig::default(), AuthConfig::api_token("token")).unwrap();
    let response = client
        .request(Method::DELETE, &url(&mock_server, "subscribers.xml"), RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow.xml"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .timeout(Duration::from_millis(50))
        .max_retries(0)
        .build();
    let client = HttpClient::with_config(config).unwrap();
    let result = client
        .request(Method::GET, &url(&mock_server, "slow.xml"), RequestConfig::new())
        .await;

    assert!(matches!(result, Err(Error::Timeout { timeout_ms: 50 })));
}

#[tokio::test]
async fn test_connection_refused_after_retries() {
    let result = client_with(1)
        .request(Method::GET, "http://127.0.0.1:1/subscribers.xml", RequestConfig::new())
        .await;

    assert!(matches!(result, Err(Error::Http(_))));
}

#[test_case(BackoffType::Constant, 0, 100; "constant first")]
#[test_case(BackoffType::Constant, 6, 100; "constant stays flat")]
#[test_case(BackoffType::Linear, 0, 100; "linear first")]
#[test_case(BackoffType::Linear, 2, 300; "linear third")]
#[test_case(BackoffType::Exponential, 1, 200; "exponential second")]
#[test_case(BackoffType::Exponential, 3, 800; "exponential fourth")]
#[test_case(BackoffType::Exponential, 4, 1000; "exponential capped")]
#[test_case(BackoffType::Linear, 40, 1000; "linear capped")]
#[test_case(BackoffType::Exponential, 64, 1000; "huge attempt saturates")]
fn backoff_delay(kind: BackoffType, attempt: u32, expected_ms: u64) {
    let config = HttpClientConfig::builder()
        .backoff(kind, Duration::from_millis(100), Duration::from_secs(1))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(attempt), Duration::from_millis(expected_ms));
}
