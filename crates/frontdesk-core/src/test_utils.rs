//! Test utilities for frontdesk-core
//!
//! This module provides testing infrastructure including a mock backend
//! API server that can be used for development and integration tests.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Mock backend API server for testing and development.
///
/// Serves the OAuth start and reconcile endpoints the handshake driver
/// talks to. Failure modes are scriptable per server instance.
pub struct MockApiServer {
    addr: SocketAddr,
    script: Arc<ServerScript>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Default)]
struct ServerScript {
    omit_start_url: AtomicBool,
    fail_reconcile: AtomicBool,
    start_requests: AtomicU32,
    reconcile_requests: AtomicU32,
}

impl MockApiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let script = Arc::new(ServerScript::default());
        let app = Router::new()
            .route("/api/calendar/oauth/start", get(handle_oauth_start))
            .route("/api/google/oauth/start", get(handle_oauth_start))
            .route("/api/calendar/oauth/reconcile", post(handle_reconcile))
            .with_state(script.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            script,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Script start responses to omit the authorization URL
    pub fn omit_start_url(&self) {
        self.script.omit_start_url.store(true, Ordering::SeqCst);
    }

    /// Script reconcile requests to fail with 503
    pub fn fail_reconcile(&self) {
        self.script.fail_reconcile.store(true, Ordering::SeqCst);
    }

    pub fn start_requests(&self) -> u32 {
        self.script.start_requests.load(Ordering::SeqCst)
    }

    pub fn reconcile_requests(&self) -> u32 {
        self.script.reconcile_requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// OAuth start endpoint: mints a third-party authorization URL
async fn handle_oauth_start(
    State(script): State<Arc<ServerScript>>,
) -> Json<StartAuthorizationResponse> {
    script.start_requests.fetch_add(1, Ordering::SeqCst);

    let url = if script.omit_start_url.load(Ordering::SeqCst) {
        None
    } else {
        Some("https://accounts.example.com/o/oauth2/auth?state=mock".to_string())
    };

    Json(StartAuthorizationResponse { url })
}

/// OAuth reconcile endpoint: syncs backend state after authorization
async fn handle_reconcile(State(script): State<Arc<ServerScript>>) -> StatusCode {
    script.reconcile_requests.fetch_add(1, Ordering::SeqCst);

    if script.fail_reconcile.load(Ordering::SeqCst) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

#[derive(Debug, Serialize)]
struct StartAuthorizationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}
