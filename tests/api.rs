//! Snapshot API over a live listener.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;
use status_aggregator::aggregator::{Aggregator, CaptureToggle};
use status_aggregator::config::ApiConfig;
use status_aggregator::health::{HttpProber, ServiceKind};
use status_aggregator::http::{ApiServer, AppState};
use status_aggregator::lifecycle::Shutdown;
use tokio_tungstenite::{connect_async, tungstenite::Message};

mod common;

const PROCESSOR_HEALTHY: &str = r#"{"status":"healthy","splunk":"connected","version":"1.0.0"}"#;
const GENERATOR_RUNNING: &str = r#"{"status":"running","log_files":["conn.log"]}"#;

async fn setup() -> (Aggregator<HttpProber>, SocketAddr, Shutdown) {
    let processor = common::start_json_backend(200, PROCESSOR_HEALTHY).await;
    let generator = common::start_json_backend(200, GENERATOR_RUNNING).await;
    let services = vec![
        common::service("processor", ServiceKind::Processor, processor),
        common::service("logGenerator", ServiceKind::LogGenerator, generator),
    ];
    let aggregator = Aggregator::new(&services, HttpProber::new(), CaptureToggle::new(false));

    let state = AppState {
        store: aggregator.store(),
        capture: aggregator.capture(),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = ApiServer::new(&ApiConfig::default(), state);
    tokio::spawn(server.run(listener, shutdown.subscribe()));

    (aggregator, addr, shutdown)
}

#[tokio::test]
async fn status_endpoint_serves_latest_snapshot() {
    let (mut aggregator, addr, shutdown) = setup().await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let before: Value = client
        .get(format!("http://{}/api/status", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before["sequence"], 0);
    assert_eq!(before["records"][0]["status"], "unknown");

    aggregator.run_cycle().await;

    let res = client
        .get(format!("http://{}/api/status", addr))
        .send()
        .await
        .unwrap();
    assert!(res.headers().contains_key("x-request-id"));
    let after: Value = res.json().await.unwrap();
    assert_eq!(after["sequence"], 1);
    assert_eq!(after["records"][0]["identity"], "processor");
    assert_eq!(after["records"][0]["status"], "healthy");
    assert_eq!(after["signals"]["live_capture_active"], true);
    assert_eq!(after["signals"]["indexer_reachable"], true);
    assert_eq!(after["signals"]["overall"], "healthy");

    shutdown.trigger();
}

#[tokio::test]
async fn single_service_lookup() {
    let (mut aggregator, addr, shutdown) = setup().await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    aggregator.run_cycle().await;

    let record: Value = client
        .get(format!("http://{}/api/status/logGenerator", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["kind"], "log_generator");
    assert_eq!(record["last_payload"]["log_files"][0], "conn.log");

    let missing = client
        .get(format!("http://{}/api/status/nope", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn capture_toggle_round_trip() {
    let (mut aggregator, addr, shutdown) = setup().await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let current: Value = client
        .get(format!("http://{}/api/capture", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["enabled"], false);

    let updated: Value = client
        .put(format!("http://{}/api/capture", addr))
        .json(&serde_json::json!({ "enabled": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["enabled"], true);

    let snapshot = aggregator.run_cycle().await;
    assert_eq!(snapshot.signals.capture, status_aggregator::aggregator::CaptureState::Live);

    shutdown.trigger();
}

#[tokio::test]
async fn healthz_reports_healthy() {
    let (_aggregator, addr, shutdown) = setup().await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let body: Value = client
        .get(format!("http://{}/healthz", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");

    shutdown.trigger();
}

#[tokio::test]
async fn stream_pushes_each_snapshot() {
    let (mut aggregator, addr, shutdown) = setup().await;

    let (mut stream, _) = connect_async(format!("ws://{}/api/stream", addr))
        .await
        .unwrap();

    let first = next_snapshot(&mut stream).await;
    assert_eq!(first["sequence"], 0);

    aggregator.run_cycle().await;
    let second = next_snapshot(&mut stream).await;
    assert_eq!(second["sequence"], 1);
    assert_eq!(second["signals"]["capture"], "off");

    shutdown.trigger();
}

async fn next_snapshot<S>(stream: &mut S) -> Value
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("no frame within 5s")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}
