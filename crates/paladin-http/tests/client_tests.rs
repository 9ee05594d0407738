// Integration tests for the logging HTTP client
// Runs against a local mockito server

mod common;

use common::{mock_get, CLOSED_URL};
use paladin_core::logging_facility::test_capture::init_test_capture;
use paladin_core::{ExErrorKind, HttpClientConfig};
use paladin_http::client::parse_header;
use paladin_http::{default_client, ClientOptions, Method};
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::Level;

fn conf() -> HttpClientConfig {
    HttpClientConfig {
        timeout: 5,
        retries: 0,
    }
}

#[test]
fn test_get_joins_base_url_and_buffers_body() {
    // Given: A server answering one JSON request
    let mut server = mockito::Server::new();
    let mock = mock_get(&mut server, "/json", 200, "application/json", r#"{"ip":"1.2.3.4"}"#);
    let client = default_client(ClientOptions::new().base_url(server.url()), &conf()).unwrap();

    // When: A relative path is fetched
    let resp = client.get("/json").unwrap();

    // Then: The request hit the joined URL and the body is readable
    mock.assert();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.reason(), "OK");
    assert_eq!(resp.content_type(), Some("application/json"));
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["ip"], "1.2.3.4");
}

#[test]
fn test_default_and_request_headers_are_sent() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/items")
        .match_header("x-client", "paladin")
        .match_header("x-extra", "1")
        .match_header("authorization", "Bearer s3cret")
        .match_body("payload")
        .with_status(201)
        .with_header("content-type", "text/plain")
        .with_body("ok")
        .create();
    let client = default_client(
        ClientOptions::new().header("X-Client", "paladin").bearer_token("s3cret"),
        &conf(),
    )
    .unwrap();
    let mut headers = HeaderMap::new();
    let (name, value) = parse_header("X-Extra: 1").unwrap();
    headers.insert(name, value);

    let resp = client
        .send(
            Method::POST,
            &format!("{}/items", server.url()),
            headers,
            Some("payload".to_string()),
        )
        .unwrap();

    mock.assert();
    assert_eq!(resp.status().as_u16(), 201);
    assert_eq!(resp.request_headers().get("x-extra").unwrap(), "1");
    assert_eq!(resp.text(), "ok");
}

#[test]
fn test_error_status_is_returned_without_raise_for_status() {
    let mut server = mockito::Server::new();
    let _mock = mock_get(&mut server, "/missing", 404, "text/html", "<h1>nope</h1>");
    let client = default_client(ClientOptions::new(), &conf()).unwrap();

    let resp = client.get(&format!("{}/missing", server.url())).unwrap();

    assert!(resp.is_error());
    assert_eq!(resp.status().as_u16(), 404);
}

#[test]
fn test_raise_for_status_turns_error_into_external_service() {
    let mut server = mockito::Server::new();
    let _mock = mock_get(&mut server, "/fail", 500, "text/plain", "boom");
    let client = default_client(ClientOptions::new().raise_for_status(true), &conf()).unwrap();

    let err = client.get(&format!("{}/fail", server.url())).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ExternalService);
    assert!(err.message().contains("returned 500"));
    assert!(err.request_id().is_some());
}

#[test]
fn test_connect_failure_after_retries() {
    let client = default_client(ClientOptions::new().retries(2), &conf()).unwrap();

    let err = client.get(CLOSED_URL).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ExternalService);
    assert!(err.message().starts_with("GET http://127.0.0.1"));
}

#[test]
fn test_slow_server_times_out() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/slow")
        .with_status(200)
        .with_body_from_request(|_| {
            std::thread::sleep(Duration::from_secs(3));
            b"late".to_vec()
        })
        .create();
    let client = default_client(ClientOptions::new().timeout(1), &conf()).unwrap();

    let err = client.get(&format!("{}/slow", server.url())).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Timeout);
}

#[test]
fn test_request_and_response_are_logged() {
    // Given: Log capture at TRACE
    let capture = init_test_capture();
    let mut server = mockito::Server::new();
    let _mock = mock_get(&mut server, "/logged", 200, "application/json", r#"{"k":"v"}"#);
    let client = default_client(ClientOptions::new(), &conf()).unwrap();
    let url = format!("{}/logged", server.url());

    // When: A request completes
    let resp = client.get(&url).unwrap();

    // Then: Request and response summaries are logged at DEBUG
    let req = capture.messages_containing(&format!("Req: GET {}", url));
    assert_eq!(req.len(), 1);
    assert_eq!(req[0].level, Level::DEBUG);
    let id = resp.request_id().to_string();
    assert_eq!(req[0].fields.get("request_id"), Some(&id));

    let summary = format!(
        "Resp: GET {} -> [200 OK], <application/json {}>",
        url,
        resp.content_length().unwrap()
    );
    let events = capture.messages_containing(&summary);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::DEBUG);

    // And: The TRACE detail carries the JSON body
    let detail = capture.messages_containing(&format!("GET {} 200\n", url));
    assert_eq!(detail.len(), 1);
    assert_eq!(detail[0].level, Level::TRACE);
    assert!(detail[0].message.as_deref().unwrap().ends_with(r#"{"k":"v"}"#));
}

#[test]
fn test_error_response_logged_at_warn_with_body_omitted() {
    let capture = init_test_capture();
    let mut server = mockito::Server::new();
    let _mock = mock_get(&mut server, "/image", 403, "image/png", "PNG");
    let client = default_client(ClientOptions::new(), &conf()).unwrap();
    let url = format!("{}/image", server.url());

    client.get(&url).unwrap();

    let events = capture.messages_containing(&format!("Resp: GET {} -> [403 Forbidden]", url));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);

    let detail = capture.messages_containing(&format!("GET {} 403\n", url));
    assert!(detail[0].message.as_deref().unwrap().ends_with("<omitted>"));
}
