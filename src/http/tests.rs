//! Tests for the HTTP client module

use super::client::parse_api_error;
use super::*;
use crate::error::Error;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
struct TablesOut {
    table_names: Vec<String>,
}

fn client_for(server: &MockServer, content_type: &str) -> ApiClient {
    let config = ApiClientConfig::builder()
        .endpoint(server.uri())
        .content_type(content_type)
        .timeout(Duration::from_secs(5))
        .build();
    ApiClient::new(config).unwrap()
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_api_client_config_default() {
    let config = ApiClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.content_type, LOGS_CONTENT_TYPE);
    assert!(config.default_headers.is_empty());
    assert_eq!(config.user_agent, format!("logscope/{}", crate::VERSION));
}

#[test]
fn test_api_client_config_builder() {
    let config = ApiClientConfig::builder()
        .endpoint("https://logs.example.com")
        .timeout(Duration::from_secs(60))
        .content_type(TABLES_CONTENT_TYPE)
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.endpoint, "https://logs.example.com");
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.content_type, TABLES_CONTENT_TYPE);
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

// ============================================================================
// Error Classification Tests
// ============================================================================

#[test]
fn test_parse_api_error_namespaced_type() {
    let err = parse_api_error(
        400,
        r#"{"__type":"com.amazonaws.logs#ResourceNotFoundException","message":"group missing"}"#,
    );
    match err {
        Error::Api {
            status,
            kind,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(kind, "ResourceNotFoundException");
            assert_eq!(message, "group missing");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_parse_api_error_capitalized_message() {
    let err = parse_api_error(400, r#"{"__type":"ValidationException","Message":"bad limit"}"#);
    assert!(matches!(err, Error::Api { ref message, .. } if message == "bad limit"));
}

#[test]
fn test_parse_api_error_non_json_body() {
    let err = parse_api_error(502, "  Bad Gateway\n");
    match err {
        Error::Api { status, kind, message } => {
            assert_eq!(status, 502);
            assert_eq!(kind, "UnknownError");
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_parse_api_error_xml_body() {
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>AccessDenied</Code><Message>Access &amp; permissions denied</Message></Error>"#;
    match parse_api_error(403, body) {
        Error::Api {
            status,
            kind,
            message,
        } => {
            assert_eq!(status, 403);
            assert_eq!(kind, "AccessDenied");
            assert_eq!(message, "Access & permissions denied");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// XML Extraction Tests
// ============================================================================

#[test]
fn test_xml_elements_skip_longer_tag_names() {
    let body = "<Buckets><Bucket><Name>a</Name></Bucket><Bucket>\n<Name>b</Name></Bucket></Buckets>";

    let buckets = xml::elements(body, "Bucket");
    assert_eq!(buckets, vec!["<Name>a</Name>", "\n<Name>b</Name>"]);
    assert_eq!(xml::elements(body, "Buckets").len(), 1);
    assert!(xml::elements(body, "Owner").is_empty());
}

#[test]
fn test_xml_elements_attributes_and_self_closing() {
    let body = r#"<Root xmlns="http://example.com/doc"><Token/><Name>x</Name></Root>"#;

    let root = xml::elements(body, "Root");
    assert_eq!(root, vec![r#"<Token/><Name>x</Name>"#]);
    assert_eq!(xml::elements(root[0], "Token"), vec![""]);
    assert_eq!(xml::element_text(root[0], "Name").as_deref(), Some("x"));
}

#[test]
fn test_xml_element_text_unescapes() {
    let body = "<Name> logs &lt;prod&gt; &amp;amp; </Name>";
    assert_eq!(
        xml::element_text(body, "Name").as_deref(),
        Some("logs <prod> &amp;")
    );
    assert_eq!(xml::element_text("<Name>unclosed", "Name"), None);
}

// ============================================================================
// Request Tests
// ============================================================================

#[tokio::test]
async fn test_call_sends_target_and_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("X-Amz-Target", "DynamoDB_20120810.ListTables"))
        .and(header("Content-Type", TABLES_CONTENT_TYPE))
        .and(body_json(json!({"Limit": 2})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"TableNames": ["orders", "users"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, TABLES_CONTENT_TYPE);
    let out: TablesOut = client
        .call("DynamoDB_20120810.ListTables", &json!({"Limit": 2}))
        .await
        .unwrap();

    assert_eq!(out.table_names, vec!["orders", "users"]);
}

#[tokio::test]
async fn test_call_sends_default_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("X-Trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"TableNames": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ApiClientConfig::builder()
        .endpoint(server.uri())
        .header("X-Trace", "abc")
        .build();
    let client = ApiClient::new(config).unwrap();

    let out: TablesOut = client.call("Any.Target", &json!({})).await.unwrap();
    assert!(out.table_names.is_empty());
}

#[tokio::test]
async fn test_call_maps_error_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "__type": "ThrottlingException",
            "message": "Rate exceeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, LOGS_CONTENT_TYPE);
    let err = client
        .call::<_, TablesOut>("Logs_20140328.DescribeLogGroups", &json!({}))
        .await
        .unwrap_err();

    assert!(err.is_remote());
    assert!(matches!(err, Error::Api { status: 400, ref kind, .. } if kind == "ThrottlingException"));
}

#[tokio::test]
async fn test_call_does_not_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, LOGS_CONTENT_TYPE);
    let result = client
        .call::<_, TablesOut>("Logs_20140328.DescribeLogGroups", &json!({}))
        .await;

    assert!(matches!(result, Err(Error::Api { status: 503, .. })));
}

#[tokio::test]
async fn test_call_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server, LOGS_CONTENT_TYPE);
    let result = client.call::<_, TablesOut>("X.Y", &json!({})).await;

    assert!(matches!(result, Err(Error::JsonParse(_))));
}

#[tokio::test]
async fn test_call_streaming_returns_raw_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("X-Amz-Target", "Logs_20140328.StartLiveTail"))
        .respond_with(ResponseTemplate::new(200).set_body_string("line-1\nline-2\n"))
        .mount(&server)
        .await;

    let client = client_for(&server, LOGS_CONTENT_TYPE);
    let response = client
        .call_streaming("Logs_20140328.StartLiveTail", &json!({}))
        .await
        .unwrap();

    assert_eq!(response.text().await.unwrap(), "line-1\nline-2\n");
}

#[tokio::test]
async fn test_get_text_sends_query_and_accept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("max-buckets", "2"))
        .and(header("Accept", REST_XML_CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, REST_XML_CONTENT_TYPE);
    let body = client
        .get_text(&[("max-buckets", "2".to_string())])
        .await
        .unwrap();

    assert_eq!(body, "<ok/>");
}

#[tokio::test]
async fn test_get_text_maps_xml_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<Error><Code>InvalidAccessKeyId</Code><Message>unknown key</Message></Error>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, REST_XML_CONTENT_TYPE);
    let err = client.get_text(&[]).await.unwrap_err();

    assert!(
        matches!(err, Error::Api { status: 403, ref kind, .. } if kind == "InvalidAccessKeyId")
    );
}
