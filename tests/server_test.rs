//! Integration tests for the newline-delimited JSON host protocol.

use ceph_provider::mocks::{MockResponse, MockSigner, MockTransport};
use ceph_provider::{Provider, Server};
use serde_json::{json, Value};
use std::sync::Arc;

fn server(transport: Arc<MockTransport>) -> Server {
    Server::new(
        Provider::new()
            .with_env(|_| None)
            .with_transport(transport)
            .with_signer(Arc::new(MockSigner::new())),
    )
}

async fn exchange(server: Server, lines: &[Value]) -> Vec<Value> {
    let mut input = String::new();
    for line in lines {
        input.push_str(&line.to_string());
        input.push('\n');
    }

    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn configure() -> Value {
    json!({"op": "configure", "config": {"access_key": "AKID", "secret_key": "SECRET"}})
}

fn lifecycle(op: &str, state: Value) -> Value {
    json!({"op": op, "resource_type": "ceph_s3_bucket", "state": state})
}

#[tokio::test]
async fn test_full_lifecycle() {
    let transport = Arc::new(MockTransport::with_responses(vec![
        MockResponse::ok(),
        MockResponse::ok(),
        MockResponse::no_content(),
    ]));

    let responses = exchange(
        server(transport.clone()),
        &[
            configure(),
            lifecycle("create", json!({"name": "foo"})),
            lifecycle("read", json!({"id": "foo", "name": "foo"})),
            lifecycle("update", json!({"id": "foo", "name": "foo"})),
            lifecycle("delete", json!({"id": "foo", "name": "foo"})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 5);
    assert_eq!(responses[0], json!({"diagnostics": []}));

    assert_eq!(responses[1]["diagnostics"], json!([]));
    assert_eq!(responses[1]["state"]["id"], "foo");
    assert!(responses[1]["state"]["created"].is_string());

    assert_eq!(responses[2]["diagnostics"], json!([]));
    assert_eq!(
        responses[3]["diagnostics"],
        json!([{"severity": "warning", "summary": "bucket update not supported"}])
    );

    assert_eq!(responses[4], json!({"diagnostics": []}));

    let methods: Vec<String> = transport.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec!["PUT", "GET", "DELETE"]);
}

#[tokio::test]
async fn test_malformed_line_does_not_stop_server() {
    let transport = Arc::new(MockTransport::new());
    let mut input = String::from("this is not json\n");
    input.push_str(&json!({"op": "get_schema"}).to_string());
    input.push('\n');

    let mut output = Vec::new();
    server(transport)
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["diagnostics"][0]["summary"], "malformed request");
    assert_eq!(
        responses[1]["schema"]["provider"]["attributes"][1]["name"],
        "secret_key"
    );
    assert_eq!(
        responses[1]["schema"]["provider"]["attributes"][1]["sensitive"],
        true
    );
}

#[tokio::test]
async fn test_lifecycle_before_configure() {
    let transport = Arc::new(MockTransport::with_default(MockResponse::ok()));

    let responses = exchange(
        server(transport.clone()),
        &[lifecycle("create", json!({"name": "foo"}))],
    )
    .await;

    let summary = responses[0]["diagnostics"][0]["summary"].as_str().unwrap();
    assert!(summary.starts_with("provider is not configured"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_failed_delete_keeps_state() {
    let transport = Arc::new(MockTransport::with_responses(vec![MockResponse::error(
        403,
        "<Code>AccessDenied</Code>",
    )]));

    let responses = exchange(
        server(transport),
        &[configure(), lifecycle("delete", json!({"id": "foo", "name": "foo"}))],
    )
    .await;

    assert_eq!(responses[1]["diagnostics"][0]["severity"], "error");
    assert_eq!(responses[1]["state"]["name"], "foo");
}

#[tokio::test]
async fn test_invalid_state() {
    let transport = Arc::new(MockTransport::new());

    let responses = exchange(
        server(transport),
        &[configure(), lifecycle("create", json!({"id": 42}))],
    )
    .await;

    assert_eq!(
        responses[1]["diagnostics"][0]["summary"],
        "invalid state for ceph_s3_bucket"
    );
}

#[tokio::test]
async fn test_invalid_utf8_line_does_not_stop_server() {
    let transport = Arc::new(MockTransport::new());
    let mut input = vec![0xff, 0xfe, b'\n'];
    input.extend_from_slice(json!({"op": "get_schema"}).to_string().as_bytes());
    input.push(b'\n');

    let mut output = Vec::new();
    server(transport)
        .serve(input.as_slice(), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["diagnostics"][0]["severity"], "error");
    assert_eq!(responses[0]["diagnostics"][0]["summary"], "malformed request");
    assert!(responses[1]["schema"]["resources"]["ceph_s3_bucket"].is_object());
}

#[tokio::test]
async fn test_crlf_and_blank_lines() {
    let transport = Arc::new(MockTransport::new());
    let input = "\r\n\n{\"op\":\"get_schema\"}\r\n";

    let mut output = Vec::new();
    server(transport)
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.lines().count(), 1);
    let response: Value = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(response["diagnostics"], json!([]));
}
