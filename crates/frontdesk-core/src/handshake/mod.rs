//! Authorization popup handshake
//!
//! Connecting an external account (calendar booking access, Google
//! sign-in) runs through a popup window: the backend mints a third-party
//! authorization URL, the popup walks the user through consent, and its
//! final redirect page posts a completion message back to the opener.
//! The driver in this module runs the opener's half of that dance and
//! settles every attempt on exactly one outcome.
//!
//! Everything environmental (HTTP, window management, message delivery)
//! sits behind the [`AuthorizationGateway`] trait, so the same driver
//! runs against the real backend or a scripted mock.

pub mod driver;
pub mod http;
pub mod mock;
pub mod types;

pub use driver::{run, HandshakeSession};
pub use http::{HttpGateway, WindowOpener};
pub use mock::MockGateway;
pub use types::{
    FlowMessage, FlowSpec, HandshakeOutcome, HandshakePhase, HandshakeReport, PopupHandle,
    ReconciliationStatus, WindowGeometry,
};

use crate::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Trait for environments that can host an authorization handshake
#[async_trait]
pub trait AuthorizationGateway: Send + Sync {
    /// Fetch the third-party authorization URL for a flow
    async fn start_authorization(&self, path: &str) -> Result<String>;

    /// Open the authorization popup. `None` means the popup was blocked.
    fn open_window(&self, url: &str, geometry: WindowGeometry) -> Option<PopupHandle>;

    /// Subscribe to cross-window completion messages
    fn subscribe(&self) -> broadcast::Receiver<FlowMessage>;

    /// Reconcile backend state after a confirmed handshake
    async fn reconcile(&self, path: &str) -> Result<()>;
}

/// Gateway client that can use different environments
pub enum GatewayClient {
    Http(HttpGateway),
    Mock(MockGateway),
}

impl GatewayClient {
    /// Create a client backed by the real API and a window opener
    /// supplied by the embedding shell
    pub fn http(base_url: &str, opener: WindowOpener) -> Self {
        GatewayClient::Http(HttpGateway::new(base_url, opener))
    }

    /// Create a scripted mock client for testing
    pub fn mock() -> Self {
        GatewayClient::Mock(MockGateway::new())
    }

    pub fn gateway_name(&self) -> &str {
        match self {
            GatewayClient::Http(_) => "http",
            GatewayClient::Mock(_) => "mock",
        }
    }
}

#[async_trait]
impl AuthorizationGateway for GatewayClient {
    async fn start_authorization(&self, path: &str) -> Result<String> {
        match self {
            GatewayClient::Http(gateway) => gateway.start_authorization(path).await,
            GatewayClient::Mock(gateway) => gateway.start_authorization(path).await,
        }
    }

    fn open_window(&self, url: &str, geometry: WindowGeometry) -> Option<PopupHandle> {
        match self {
            GatewayClient::Http(gateway) => gateway.open_window(url, geometry),
            GatewayClient::Mock(gateway) => gateway.open_window(url, geometry),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<FlowMessage> {
        match self {
            GatewayClient::Http(gateway) => gateway.subscribe(),
            GatewayClient::Mock(gateway) => gateway.subscribe(),
        }
    }

    async fn reconcile(&self, path: &str) -> Result<()> {
        match self {
            GatewayClient::Http(gateway) => gateway.reconcile(path).await,
            GatewayClient::Mock(gateway) => gateway.reconcile(path).await,
        }
    }
}
