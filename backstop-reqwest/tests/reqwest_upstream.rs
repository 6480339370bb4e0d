//! Integration tests for ReqwestUpstream behind the full pipeline,
//! using wiremock.

use std::sync::Arc;
use std::time::Duration;

use backstop::{Chain, Client, PipelineConfig, RequestDescriptor};
use backstop_reqwest::ReqwestUpstream;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config() -> PipelineConfig {
    PipelineConfig::default()
        .with_retry_delay(Duration::from_millis(100))
        .with_duplicate_window(Duration::from_millis(80))
        .with_memory_ttl(Duration::from_millis(400))
}

fn client() -> Client {
    let upstream = ReqwestUpstream::with_default_timeouts().expect("client construction");
    Client::new(Chain::builder().config(config()).build(Arc::new(upstream)))
}

fn get(server: &MockServer, route: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("{}{route}", server.uri()).parse().unwrap())
}

#[tokio::test]
async fn repeated_get_hits_the_server_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "id": 1, "name": "Ada" }
            ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client();

    let first = client.call(get(&server, "/users")).await;
    let users: serde_json::Value = serde_json::from_slice(first.data().unwrap()).unwrap();
    assert_eq!(users[0]["name"], "Ada");

    let second = client.call(get(&server, "/users")).await;
    assert_eq!(second.data(), first.data());
}

#[tokio::test]
async fn transient_503_is_retried_to_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client().call(get(&server, "/flaky")).await;
    assert_eq!(outcome.data().map(|body| body.as_ref()), Some(&b"recovered"[..]));
}

#[tokio::test]
async fn not_found_maps_to_prose() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nowhere"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let outcome = client().call(get(&server, "/nowhere")).await;
    assert_eq!(outcome.error_code(), Some(404));
    assert_eq!(outcome.error_message(), Some("not found"));
}

#[tokio::test]
async fn request_body_and_headers_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(wiremock::matchers::header("content-type", "application/json"))
        .and(wiremock::matchers::body_string(r#"{"title":"hello"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let request = RequestDescriptor::post(format!("{}/posts", server.uri()).parse().unwrap())
        .with_header(
            http::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        )
        .with_body(bytes::Bytes::from_static(br#"{"title":"hello"}"#));

    let outcome = client().call(request).await;
    assert!(outcome.is_success());
}
