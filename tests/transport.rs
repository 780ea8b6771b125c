mod common;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest::{Client, Method, StatusCode};
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use content_delivery_sdk::api::ContentType;
use content_delivery_sdk::transport::{
    BrowserTransport, HookError, OutgoingRequest, RestCallArgs, Transport,
};
use content_delivery_sdk::{
    CallOptions, ContentClient, Error, GetItemRequest, QueryRequest, Runtime,
    create_delivery_client,
};

use common::{config, init_logging};

const ITEM_PATH: &str = "/content/published/api/v1.1/items/CORE1";

async fn item_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ITEM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "CORE1"})))
        .mount(&server)
        .await;
    server
}

fn browser_transport() -> Arc<dyn Transport> {
    let http = Client::builder().no_proxy().build().unwrap();
    Arc::new(BrowserTransport::new(http))
}

#[tokio::test]
async fn hook_returning_false_never_sends() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_delivery_client(&config(&server.uri()))
        .unwrap()
        .with_before_send(Arc::new(|_: &mut OutgoingRequest| -> Result<bool, HookError> {
            Ok(false)
        }));
    let err = client
        .get_item(&GetItemRequest::by_id("CORE1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Aborted));
}

#[tokio::test]
async fn hook_can_rewrite_headers() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ITEM_PATH))
        .and(header("x-trace-id", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "CORE1"})))
        .expect(1)
        .mount(&server)
        .await;

    let hook = Arc::new(|req: &mut OutgoingRequest| -> Result<bool, HookError> {
        req.headers
            .insert("x-trace-id", HeaderValue::from_static("abc123"));
        Ok(true)
    });
    let client = create_delivery_client(&config(&server.uri())).unwrap();
    let item = client
        .get_item(
            &GetItemRequest::by_id("CORE1").with_options(CallOptions::default().before_send(hook)),
        )
        .await
        .unwrap();
    assert_eq!(item["id"], "CORE1");
}

#[tokio::test]
async fn hook_failure_is_reported() {
    init_logging();
    let server = item_server().await;
    let client = create_delivery_client(&config(&server.uri()))
        .unwrap()
        .with_before_send(Arc::new(|_: &mut OutgoingRequest| -> Result<bool, HookError> {
            Err("signing key unavailable".into())
        }));
    let err = client
        .get_item(&GetItemRequest::by_id("CORE1"))
        .await
        .unwrap_err();
    match err {
        Error::BeforeSend(msg) => assert!(msg.contains("signing key unavailable")),
        other => panic!("expected hook error, got {:?}", other),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn slow_server_times_out() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ITEM_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = create_delivery_client(
        &config(&server.uri()).with_timeout(Duration::from_millis(100)),
    )
    .unwrap();
    let err = client
        .get_item(&GetItemRequest::by_id("CORE1"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Timeout(limit) if limit == Duration::from_millis(100)),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ITEM_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such item"))
        .mount(&server)
        .await;

    let client = create_delivery_client(&config(&server.uri())).unwrap();
    let err = client
        .get_item(&GetItemRequest::by_id("CORE1"))
        .await
        .unwrap_err();
    match err {
        Error::Http {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(status_text, "Not Found");
            assert_eq!(body, "no such item");
        }
        other => panic!("expected http error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_success_is_an_invalid_response() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ITEM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = create_delivery_client(&config(&server.uri())).unwrap();
    let err = client
        .get_item(&GetItemRequest::by_id("CORE1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidResponse { body } if body.contains("maintenance")));
}

#[tokio::test]
async fn static_authorization_is_sent_by_the_server_runtime() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ITEM_PATH))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "CORE1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        create_delivery_client(&config(&server.uri()).with_authorization("Basic dXNlcjpwYXNz"))
            .unwrap();
    client
        .get_item(&GetItemRequest::by_id("CORE1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn browser_session_auth_is_not_sent_for_published_content() {
    init_logging();
    let server = item_server().await;
    let client = create_delivery_client(
        &config(&server.uri())
            .with_authorization("session")
            .with_runtime(Runtime::Browser),
    )
    .unwrap()
    .with_transport(browser_transport());
    client
        .get_item(&GetItemRequest::by_id("CORE1"))
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn browser_sends_static_auth_for_draft_content() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content/management/api/v1.1/items"))
        .and(header("authorization", "session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ContentClient::management(
        &config(&server.uri())
            .with_authorization("session")
            .with_runtime(Runtime::Browser),
    )
    .unwrap()
    .with_transport(browser_transport());
    client.query_items(&QueryRequest::default()).await.unwrap();
}

#[tokio::test]
async fn browser_post_without_exemption_sends_csrf_token() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/content/management/api/v1.1/items"))
        .and(header("x-csrf-token", "tok-123"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .and(header("content-type", "application/json; charset=UTF-8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "NEW"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/content/management/api/v1.1/graphql-exempt"))
        .and(|req: &Request| !req.headers.contains_key("x-csrf-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let http = Client::builder().no_proxy().build().unwrap();
    let transport = BrowserTransport::new(http).with_csrf_token("tok-123");

    let mut args = RestCallArgs::new(Method::POST, server.uri(), ContentType::Draft);
    args.post_data = Some(json!({"name": "new item"}));
    let created = transport
        .call_rest_server(
            &format!("{}/content/management/api/v1.1/items", server.uri()),
            &args,
        )
        .await
        .unwrap();
    assert_eq!(created["id"], "NEW");

    args.no_csrf_token = true;
    transport
        .call_rest_server(
            &format!("{}/content/management/api/v1.1/graphql-exempt", server.uri()),
            &args,
        )
        .await
        .unwrap();
}
