//! Delivery tests against a throw-away local webhook receiver.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::Utc;
use pixelrelay_core::dispatch::{
    DeliveryOutcome, EventDispatcher, MockDeliveryReporter, WebhookConfig,
};
use pixelrelay_core::tracking::{normalize, RawTrackInput, TrackFields};
use pixelrelay_core::TrackedEvent;
use pixelrelay_webhook::WebhookDispatcher;

type Received = Arc<Mutex<Vec<TrackedEvent>>>;

async fn accept(State(received): State<Received>, Json(event): Json<TrackedEvent>) -> StatusCode {
    received.lock().unwrap().push(event);
    StatusCode::NO_CONTENT
}

async fn fail() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

async fn stall() -> StatusCode {
    tokio::time::sleep(Duration::from_secs(5)).await;
    StatusCode::OK
}

async fn spawn_receiver() -> (SocketAddr, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route("/hook", post(accept))
        .route("/fail", post(fail))
        .route("/slow", post(stall))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, received)
}

fn sample_event() -> TrackedEvent {
    let input = RawTrackInput {
        query: TrackFields::from_query_string(
            "url=https://a.com/pricing&time=1700000000123&timeSpent=42&device=iPhone&client=a.com",
        ),
        user_agent: Some("Mozilla/5.0".into()),
        remote_addr: Some("198.51.100.4".into()),
        ..Default::default()
    };
    normalize(&input, Utc::now())
}

fn dispatcher(url: String, timeout: Duration, reporter: &MockDeliveryReporter) -> WebhookDispatcher {
    let config = WebhookConfig {
        url: Some(url),
        timeout,
        enabled: true,
    };
    WebhookDispatcher::new(config, Arc::new(reporter.clone())).unwrap()
}

#[tokio::test]
async fn delivers_event_as_json_body() {
    let (addr, received) = spawn_receiver().await;
    let reporter = MockDeliveryReporter::new();
    let dispatcher = dispatcher(format!("http://{addr}/hook"), Duration::from_secs(5), &reporter);
    let event = sample_event();

    let report = dispatcher.spawn_delivery(event.clone()).unwrap().await.unwrap();

    assert_eq!(report.outcome, DeliveryOutcome::Delivered { status: 204 });
    assert_eq!(report.client_id, "a.com");
    assert_eq!(reporter.reports(), vec![report]);

    // No precision lost on the way through the webhook body.
    let received = received.lock().unwrap();
    assert_eq!(received.as_slice(), &[event]);
}

#[tokio::test]
async fn non_2xx_is_reported_as_rejected() {
    let (addr, _) = spawn_receiver().await;
    let reporter = MockDeliveryReporter::new();
    let dispatcher = dispatcher(format!("http://{addr}/fail"), Duration::from_secs(5), &reporter);

    let report = dispatcher.spawn_delivery(sample_event()).unwrap().await.unwrap();

    assert_eq!(report.outcome, DeliveryOutcome::Rejected { status: 503 });
    assert_eq!(reporter.len(), 1);
}

#[tokio::test]
async fn slow_receiver_times_out() {
    let (addr, _) = spawn_receiver().await;
    let reporter = MockDeliveryReporter::new();
    let dispatcher = dispatcher(format!("http://{addr}/slow"), Duration::from_millis(1), &reporter);

    let started = Instant::now();
    let report = dispatcher.spawn_delivery(sample_event()).unwrap().await.unwrap();

    assert_eq!(
        report.outcome,
        DeliveryOutcome::TimedOut {
            after: Duration::from_millis(1)
        }
    );
    // Cancelled at the deadline rather than waiting for the 5s responder.
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(reporter.len(), 1);
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let reporter = MockDeliveryReporter::new();
    let dispatcher = dispatcher(format!("http://{addr}/hook"), Duration::from_secs(5), &reporter);

    let report = dispatcher.spawn_delivery(sample_event()).unwrap().await.unwrap();

    assert!(matches!(report.outcome, DeliveryOutcome::TransportError { .. }));
    assert!(!report.outcome.is_success());
}

#[tokio::test]
async fn dispatch_returns_before_delivery_settles() {
    let (addr, _) = spawn_receiver().await;
    let reporter = MockDeliveryReporter::new();
    let dispatcher = dispatcher(format!("http://{addr}/slow"), Duration::from_secs(3), &reporter);

    let started = Instant::now();
    dispatcher.dispatch(sample_event());
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(reporter.is_empty());
}
