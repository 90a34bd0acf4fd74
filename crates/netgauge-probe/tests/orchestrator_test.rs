// Integration tests for `ProbeOrchestrator` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netgauge_probe::{
    ClientConfig, CycleState, ProbeClient, ProbeError, ProbeEvent, ProbeOrchestrator,
};
use netgauge_types::{ProbeKey, ProbeValue};

const PAYLOAD_LEN: usize = 256 * 1024;

// ── Helpers ─────────────────────────────────────────────────────────

fn endpoint_path(key: ProbeKey) -> String {
    format!("/api/{}", key.endpoint())
}

/// Mounts a healthy backend at low priority so tests can override any route.
async fn mount_defaults(server: &MockServer) {
    for &key in ProbeKey::all() {
        let response = match key {
            ProbeKey::Download => {
                ResponseTemplate::new(200).set_body_bytes(vec![7u8; PAYLOAD_LEN])
            }
            ProbeKey::Upload => ResponseTemplate::new(200).set_body_json(json!({ "uploadTime": 0.5 })),
            ProbeKey::Ip => ResponseTemplate::new(200).set_body_json(json!({ "ip": "203.0.113.7" })),
            ProbeKey::Ping => ResponseTemplate::new(200).set_body_json(json!({ "ping": 1 })),
            other => {
                let mut body = serde_json::Map::new();
                body.insert(other.as_str().to_string(), json!("clean"));
                ResponseTemplate::new(200).set_body_json(body)
            }
        };
        let verb = if key == ProbeKey::Upload { "POST" } else { "GET" };
        Mock::given(method(verb))
            .and(path(endpoint_path(key)))
            .respond_with(response)
            .with_priority(10)
            .mount(server)
            .await;
    }
}

async fn setup() -> (MockServer, ProbeOrchestrator) {
    let server = MockServer::start().await;
    let orchestrator = orchestrator_for(&server);
    (server, orchestrator)
}

fn orchestrator_for(server: &MockServer) -> ProbeOrchestrator {
    // No trailing slash on purpose: the client must add it.
    let config = ClientConfig::with_base_url(format!("{}/api", server.uri()));
    ProbeOrchestrator::new(ProbeClient::new(config).unwrap())
}

fn text(value: &str) -> ProbeValue {
    ProbeValue::from(value)
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_cycle_fills_every_slot() {
    let (server, orchestrator) = setup().await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();

    assert_eq!(report.results[&ProbeKey::Ip], text("203.0.113.7"));
    assert_eq!(report.results[&ProbeKey::Upload], text("Upload Speed: 0.50 MB/s"));
    assert_relative_eq!(report.upload_mbps, 0.5);
    assert!(report.download_mbps > 0.0);

    let download = report.results[&ProbeKey::Download].as_text().unwrap();
    assert!(download.starts_with("Download Speed: "), "{download}");
    assert!(download.ends_with(" MB/s"), "{download}");

    for key in ProbeKey::scans() {
        assert_eq!(report.results[key], text("clean"));
    }

    let history = orchestrator.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history.latest(), Some(&report.entry));
    assert_relative_eq!(report.entry.upload, 0.5);
    assert_relative_eq!(report.entry.download, report.download_mbps);
    assert_eq!(orchestrator.state(), CycleState::Completed);
}

#[tokio::test]
async fn test_each_cycle_appends_history() {
    let (server, orchestrator) = setup().await;
    mount_defaults(&server).await;

    orchestrator.run_cycle().await.unwrap();
    orchestrator.run_cycle().await.unwrap();

    assert_eq!(orchestrator.history().await.len(), 2);
}

#[tokio::test]
async fn test_upload_sends_start_time_header_and_multipart_body() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(header_exists("x-start-time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uploadTime": 0.25 })))
        .expect(1)
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    assert_eq!(report.results[&ProbeKey::Upload], text("Upload Speed: 1.00 MB/s"));

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|request| request.url.path() == "/api/upload")
        .unwrap();
    let content_type = upload.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
    assert!(upload.body.len() >= PAYLOAD_LEN);
    let start_time: i64 = upload.headers.get("x-start-time").unwrap().to_str().unwrap().parse().unwrap();
    assert!(start_time > 0);
}

#[tokio::test]
async fn test_upload_without_server_time_uses_client_timing() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("stored"))
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    let upload = report.results[&ProbeKey::Upload].as_text().unwrap();
    assert!(upload.starts_with("Upload Speed: "), "{upload}");
    assert!(report.upload_mbps > 0.0);
}

// ── Retry behavior ──────────────────────────────────────────────────

#[tokio::test]
async fn test_retry_exhaustion_stores_last_error() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ip"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    assert_eq!(
        report.results[&ProbeKey::Ip],
        text("Request failed: HTTP error! status: 500")
    );
}

#[tokio::test]
async fn test_retry_recovers_after_failures() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ip"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ip": "10.0.0.1" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    assert_eq!(report.results[&ProbeKey::Ip], text("10.0.0.1"));
}

#[tokio::test]
async fn test_fetch_with_retry_reports_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ssl-check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ssl": "valid" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProbeClient::new(ClientConfig::with_base_url(format!("{}/api", server.uri()))).unwrap();

    let failed = client.fetch_with_retry(ProbeKey::Services).await;
    assert_eq!(failed.attempts, 3);
    assert!(!failed.succeeded);
    assert_eq!(failed.value, text("Request failed: HTTP error! status: 502"));

    let ok = client.fetch_with_retry(ProbeKey::Ssl).await;
    assert_eq!(ok.attempts, 1);
    assert!(ok.succeeded);
    assert_eq!(ok.value, text("valid"));
}

#[tokio::test]
async fn test_fetch_with_retry_honors_attempt_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/nmap"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig {
        max_attempts: 1,
        ..ClientConfig::with_base_url(format!("{}/api", server.uri()))
    };
    let outcome = ProbeClient::new(config)
        .unwrap()
        .fetch_with_retry(ProbeKey::Nmap)
        .await;
    assert_eq!(outcome.attempts, 1);
    assert!(!outcome.succeeded);
}

#[tokio::test]
async fn test_missing_field_stores_whole_body() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ssl-check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "grade": "A" })))
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    assert_eq!(report.results[&ProbeKey::Ssl], text(r#"{"grade":"A"}"#));
}

#[tokio::test]
async fn test_numeric_field_is_kept_as_number() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/open-ports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ports": 4 })))
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    assert_eq!(report.results[&ProbeKey::Ports], ProbeValue::Number(4.0));
}

// ── Ping ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ping_is_overwritten_with_wall_clock() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ping": 999 }))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    let ping = report.results[&ProbeKey::Ping].as_text().unwrap();
    assert!(ping.ends_with("ms"), "{ping}");

    let millis = report.results[&ProbeKey::Ping].leading_number().unwrap();
    assert!(millis >= 50.0, "{millis}");
    assert!(millis < 999.0, "{millis}");
    assert_relative_eq!(report.entry.ping, millis);
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_failure_records_zero_speed() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    assert_eq!(
        report.results[&ProbeKey::Upload],
        text("Upload failed: HTTP error! status: 500")
    );
    assert_eq!(report.upload_mbps, 0.0);
    assert_eq!(report.entry.upload, 0.0);
    assert!(report.download_mbps > 0.0);
}

#[tokio::test]
async fn test_download_failure_skips_upload() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/download"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    assert_eq!(
        report.results[&ProbeKey::Download],
        text("Download failed: HTTP error! status: 404")
    );
    assert_eq!(
        report.results[&ProbeKey::Upload],
        text("Upload skipped: no download payload")
    );
    assert_eq!(report.entry.download, 0.0);
    assert_eq!(report.entry.upload, 0.0);
}

#[tokio::test]
async fn test_failing_scan_still_completes_cycle() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nmap"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let report = orchestrator.run_cycle().await.unwrap();
    assert_eq!(
        report.results[&ProbeKey::Nmap],
        text("Request failed: HTTP error! status: 500")
    );
    assert_eq!(report.results[&ProbeKey::Vuln], text("clean"));
    assert_eq!(orchestrator.history().await.len(), 1);
    assert_eq!(orchestrator.state(), CycleState::Completed);
}

/// Reserves a local port with nothing listening on it.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api")
}

#[tokio::test]
async fn test_unreachable_backend_still_appends_history() {
    let config = ClientConfig::with_base_url(closed_port_url());
    let orchestrator = ProbeOrchestrator::new(ProbeClient::new(config).unwrap());

    let report = orchestrator.run_cycle().await.unwrap();
    for key in std::iter::once(&ProbeKey::Ip).chain(ProbeKey::scans()) {
        let value = report.results[key].as_text().unwrap();
        assert!(value.starts_with("Request failed: "), "{key}: {value}");
        assert!(!value.contains("status"), "{key}: {value}");
    }
    let download = report.results[&ProbeKey::Download].as_text().unwrap();
    assert!(download.starts_with("Download failed: "), "{download}");
    assert!(!download.contains("status"), "{download}");

    assert_eq!(report.entry.download, 0.0);
    assert_eq!(report.entry.upload, 0.0);
    assert_eq!(orchestrator.history().await.len(), 1);
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_concurrent_cycle_is_rejected() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ip": "10.0.0.1" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let orchestrator = Arc::new(orchestrator);
    let first = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.run_cycle().await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(orchestrator.state(), CycleState::Running);
    assert!(matches!(
        orchestrator.run_cycle().await,
        Err(ProbeError::CycleInProgress)
    ));

    first.await.unwrap().unwrap();
    assert_eq!(orchestrator.state(), CycleState::Completed);
    assert_eq!(orchestrator.history().await.len(), 1);
}

#[tokio::test]
async fn test_results_are_readable_while_cycle_runs() {
    let (server, orchestrator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ping": 1 }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_defaults(&server).await;

    let orchestrator = Arc::new(orchestrator);
    let running = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.run_cycle().await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    let partial = orchestrator.results().snapshot().await;
    assert_eq!(partial[&ProbeKey::Ip], text("203.0.113.7"));
    assert_eq!(partial[&ProbeKey::Download], text("Testing..."));
    assert_eq!(partial[&ProbeKey::Nmap], text("Scanning..."));

    running.await.unwrap().unwrap();
}

// ── Events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_events_trace_the_cycle() {
    let server = MockServer::start().await;
    mount_defaults(&server).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = orchestrator_for(&server).with_events(tx);
    let report = orchestrator.run_cycle().await.unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert_eq!(events.first(), Some(&ProbeEvent::Started(ProbeKey::Ip)));
    assert_eq!(events.last(), Some(&ProbeEvent::CycleCompleted(report.entry.clone())));

    let settled = events
        .iter()
        .filter(|event| matches!(event, ProbeEvent::Settled(..)))
        .count();
    assert_eq!(settled, ProbeKey::all().len());

    let progress: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            ProbeEvent::DownloadProgress(progress) => Some(*progress),
            _ => None,
        })
        .collect();
    let last = progress.last().unwrap();
    assert_eq!(last.received, PAYLOAD_LEN as u64);
    assert_eq!(last.total, Some(PAYLOAD_LEN as u64));
    assert_eq!(last.percent, Some(100.0));
    assert!(progress.windows(2).all(|pair| pair[0].received <= pair[1].received));
}

#[tokio::test]
async fn test_dropped_event_receiver_does_not_break_cycle() {
    let server = MockServer::start().await;
    mount_defaults(&server).await;

    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let orchestrator = orchestrator_for(&server).with_events(tx);

    assert!(orchestrator.run_cycle().await.is_ok());
}
