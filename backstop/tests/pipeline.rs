//! End-to-end pipeline behavior over a scripted upstream.

use std::sync::Arc;
use std::time::{Duration, Instant};

use backstop::stage::{CACHE_STATUS_HEADER, POLICY_STATUS_HEADER};
use backstop::{Chain, PipelineConfig};
use backstop_core::{RequestDescriptor, TransportError};
use backstop_test::{MockUpstream, RecordingNotifier, response};
use http::StatusCode;
use http::header::HeaderName;

/// Short windows so tests run in tens of milliseconds. The ordering of
/// the thresholds mirrors the reference configuration: the retry delay
/// exceeds the duplicate window, and the memory TTL exceeds both.
fn config() -> PipelineConfig {
    PipelineConfig::default()
        .with_retry_delay(Duration::from_millis(100))
        .with_duplicate_window(Duration::from_millis(80))
        .with_memory_ttl(Duration::from_millis(400))
}

fn chain(upstream: Arc<MockUpstream>) -> Chain {
    Chain::builder().config(config()).build(upstream)
}

fn get(path: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("http://api.test{path}").parse().unwrap())
}

fn post(path: &str) -> RequestDescriptor {
    RequestDescriptor::post(format!("http://api.test{path}").parse().unwrap())
}

fn cache_status(response: &backstop_core::ExchangeResponse) -> Option<&str> {
    response
        .headers()
        .get(CACHE_STATUS_HEADER)
        .and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn repeated_get_is_served_from_cache_without_a_network_call() {
    let upstream = Arc::new(MockUpstream::returning(Ok(response(
        StatusCode::OK,
        b"users",
    ))));
    let chain = chain(Arc::clone(&upstream));

    let first = chain.execute(get("/users")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(cache_status(&first), Some("MISS"));

    let second = chain.execute(get("/users")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.body().as_ref(), b"users");
    assert_eq!(cache_status(&second), Some("HIT"));

    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn calls_outside_the_window_are_not_suppressed() {
    let upstream = Arc::new(MockUpstream::returning(Ok(response(StatusCode::OK, b"ok"))));
    let chain = chain(Arc::clone(&upstream));

    chain.execute(post("/posts")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    chain.execute(post("/posts")).await.unwrap();

    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn duplicate_without_cache_entry_yields_a_synthesized_429() {
    let upstream = Arc::new(MockUpstream::returning(Ok(response(
        StatusCode::INTERNAL_SERVER_ERROR,
        b"boom",
    ))));
    let notifier = Arc::new(RecordingNotifier::new());
    let chain = Chain::builder()
        .config(config())
        .notifier(Arc::clone(&notifier) as Arc<dyn backstop_core::Notifier>)
        .build(Arc::clone(&upstream) as Arc<dyn backstop_core::Upstream>);

    // 500 is deliberately non-retryable and never cached.
    let first = chain.execute(get("/users")).await.unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let second = chain.execute(get("/users")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(
        second
            .headers()
            .get(HeaderName::from_static(POLICY_STATUS_HEADER))
            .is_some()
    );
    assert_eq!(upstream.calls(), 1, "suppressed call must not reach the network");

    // The notice is fire-and-forget; give the detached task a beat.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(notifier.messages(), vec!["too many requests".to_owned()]);
}

#[tokio::test]
async fn duplicate_with_fresh_cache_entry_is_served_from_cache() {
    let upstream = Arc::new(MockUpstream::returning(Ok(response(
        StatusCode::OK,
        b"payload",
    ))));
    let chain = chain(Arc::clone(&upstream));

    chain.execute(get("/users")).await.unwrap();
    let suppressed = chain.execute(get("/users")).await.unwrap();

    assert_eq!(suppressed.status(), StatusCode::OK);
    assert_eq!(suppressed.body().as_ref(), b"payload");
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn suppression_window_slides_with_each_attempt() {
    let upstream = Arc::new(MockUpstream::returning(Ok(response(StatusCode::OK, b"ok"))));
    let chain = chain(Arc::clone(&upstream));

    chain.execute(post("/posts")).await.unwrap();

    // Each attempt lands inside the window opened by the previous one,
    // including the suppressed attempts themselves (write-then-check).
    for _ in 0..2 {
        tokio::time::sleep(Duration::from_millis(60)).await;
        let suppressed = chain.execute(post("/posts")).await.unwrap();
        assert_eq!(suppressed.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn expired_entry_is_served_stale_when_the_transport_fails() {
    let upstream = Arc::new(MockUpstream::script(vec![
        Ok(response(StatusCode::OK, b"fresh")),
        Err(TransportError::ConnectionReset),
    ]));
    let chain = chain(Arc::clone(&upstream));

    chain.execute(get("/users")).await.unwrap();

    // Let the entry age past the memory TTL.
    tokio::time::sleep(Duration::from_millis(450)).await;

    let fallback = chain.execute(get("/users")).await.unwrap();
    assert_eq!(fallback.status(), StatusCode::OK);
    assert_eq!(fallback.body().as_ref(), b"fresh");
    assert_eq!(cache_status(&fallback), Some("STALE"));
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn retryable_transport_error_is_retried_once_then_propagated() {
    let upstream = Arc::new(MockUpstream::returning(Err(
        TransportError::ConnectionRefused,
    )));
    let chain = chain(Arc::clone(&upstream));

    let started = Instant::now();
    let error = chain.execute(get("/posts")).await.unwrap_err();

    assert_eq!(error, TransportError::ConnectionRefused);
    assert_eq!(upstream.calls(), 2, "one original attempt plus one retry");
    assert!(
        started.elapsed() >= Duration::from_millis(100),
        "the retry must wait out the backoff delay"
    );
}

#[tokio::test]
async fn retryable_status_is_retried_and_the_recovery_is_cached() {
    let upstream = Arc::new(MockUpstream::script(vec![
        Ok(response(StatusCode::SERVICE_UNAVAILABLE, b"down")),
        Ok(response(StatusCode::OK, b"recovered")),
    ]));
    let chain = chain(Arc::clone(&upstream));

    let recovered = chain.execute(get("/users")).await.unwrap();
    assert_eq!(recovered.status(), StatusCode::OK);
    assert_eq!(recovered.body().as_ref(), b"recovered");
    assert_eq!(upstream.calls(), 2);

    // The retried attempt populated the cache on its way out.
    let hit = chain.execute(get("/users")).await.unwrap();
    assert_eq!(hit.body().as_ref(), b"recovered");
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn non_retryable_status_passes_through_unchanged() {
    let upstream = Arc::new(MockUpstream::returning(Ok(response(
        StatusCode::INTERNAL_SERVER_ERROR,
        b"boom",
    ))));
    let chain = chain(Arc::clone(&upstream));

    let result = chain.execute(post("/posts")).await.unwrap();
    assert_eq!(result.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(result.body().as_ref(), b"boom");
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn injected_headers_reach_the_upstream() {
    let upstream = Arc::new(MockUpstream::returning(Ok(response(StatusCode::OK, b"ok"))));
    let config = config().with_injected_header(
        HeaderName::from_static("x-api-key"),
        "secret".parse().unwrap(),
    );
    let chain = Chain::builder()
        .config(config)
        .build(Arc::clone(&upstream) as Arc<dyn backstop_core::Upstream>);

    chain.execute(post("/posts")).await.unwrap();

    let seen = upstream.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].headers().get("x-api-key").unwrap(), "secret");
}

#[tokio::test]
async fn non_get_responses_are_never_cached() {
    let upstream = Arc::new(MockUpstream::returning(Ok(response(StatusCode::OK, b"ok"))));
    let chain = chain(Arc::clone(&upstream));

    chain.execute(post("/posts")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    chain.execute(post("/posts")).await.unwrap();

    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn non_2xx_get_responses_are_never_cached() {
    let upstream = Arc::new(MockUpstream::returning(Ok(response(
        StatusCode::NOT_FOUND,
        b"missing",
    ))));
    let chain = chain(Arc::clone(&upstream));

    chain.execute(get("/nowhere")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    let second = chain.execute(get("/nowhere")).await.unwrap();

    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(upstream.calls(), 2);
}
