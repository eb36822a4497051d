// Test helpers are intentionally partially used
#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use evaluation_coordinator::domain::{LogLevel, ServiceIdentity};
use evaluation_coordinator::{
    create_database_client, create_logger, create_metrics_pusher, create_noop_metrics,
    create_prom_metrics, create_router, AppState, DatabaseConfig, LogFormat, LoggingConfig,
    MetricsBackend, MetricsConfig, MetricsPusher,
};
use reqwest::{Client, Url};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

// ============================================================================
// Test Setup
// ============================================================================

/// Database settings pointing at a port nothing listens on, so the pool is
/// created lazily and every ping fails fast.
pub fn unreachable_database() -> DatabaseConfig {
    // ---
    DatabaseConfig {
        host: Some("127.0.0.1".to_string()),
        port: Some(1),
        database: None,
        user: None,
        password: None,
        retry_count: 1,
        acquire_timeout: Duration::from_secs(1),
        min_connections: 0,
        max_connections: 1,
    }
}

pub fn metrics_config(alloy_url: &str) -> MetricsConfig {
    // ---
    MetricsConfig {
        backend: MetricsBackend::Prometheus,
        alloy_url: Url::parse(alloy_url).expect("valid test url"),
        push_interval: Duration::from_secs(1),
    }
}

/// Builds application state from explicit parts. Must run inside a runtime.
pub fn test_state(backend: MetricsBackend, alloy_url: &str) -> AppState {
    // ---
    let identity = ServiceIdentity::evaluation_coordinator();
    let logger = create_logger(
        &LoggingConfig {
            level: LogLevel::Info,
            format: LogFormat::Text,
        },
        &identity,
    );
    let database = create_database_client(&unreachable_database(), &identity)
        .expect("lazy pool creation");

    let (metrics, pusher) = match backend {
        MetricsBackend::Prometheus => (
            create_prom_metrics().expect("prometheus metrics"),
            Some(Arc::new(
                create_metrics_pusher(&metrics_config(alloy_url), &identity, &logger)
                    .expect("pusher"),
            )),
        ),
        MetricsBackend::Noop => (create_noop_metrics().expect("noop metrics"), None),
    };

    AppState::new(identity, logger, database, metrics, pusher)
}

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new(state: AppState) -> Self {
        // --

        let app = create_router(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }
}

// ============================================================================
// Fake metrics collector
// ============================================================================

/// One request received by the fake collector.
#[derive(Debug, Clone)]
pub struct ReceivedPush {
    pub content_type: Option<String>,
    pub service_name: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct CollectorState {
    received: Arc<Mutex<Vec<ReceivedPush>>>,
    status: StatusCode,
}

/// Minimal stand-in for the remote write endpoint.
pub struct FakeCollector {
    pub addr: std::net::SocketAddr,
    received: Arc<Mutex<Vec<ReceivedPush>>>,
}

impl FakeCollector {
    // ---
    /// Starts a collector answering every push with `status`.
    pub async fn start(status: StatusCode) -> Self {
        // ---
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = CollectorState {
            received: received.clone(),
            status,
        };

        let app = Router::new()
            .route("/api/v1/write", post(receive_push))
            .with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        sleep(Duration::from_millis(100)).await;

        Self { addr, received }
    }

    pub fn write_url(&self) -> String {
        format!("http://{}/api/v1/write", self.addr)
    }

    pub fn received(&self) -> Vec<ReceivedPush> {
        self.received.lock().unwrap().clone()
    }
}

async fn receive_push(
    State(state): State<CollectorState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    // ---
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.received.lock().unwrap().push(ReceivedPush {
        content_type: header("content-type"),
        service_name: header("x-service-name"),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    state.status
}

/// Convenience accessor so tests do not unwrap the option inline.
pub fn pusher(state: &AppState) -> Arc<MetricsPusher> {
    state.pusher().expect("prometheus backend has a pusher").clone()
}
