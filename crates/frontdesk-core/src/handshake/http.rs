//! Gateway implementation backed by the real API and an injected window opener.

use crate::handshake::types::{FlowMessage, PopupHandle, WindowGeometry};
use crate::handshake::AuthorizationGateway;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Window-opening hook supplied by the embedding shell.
///
/// Returns a handle to the opened popup, or `None` when the environment
/// refused to open it (popup blocker, headless host).
pub type WindowOpener = Arc<dyn Fn(&str, WindowGeometry) -> Option<PopupHandle> + Send + Sync>;

/// Capacity of the cross-window message channel. Completion messages are
/// rare one-shot events, so a small buffer is plenty.
const MESSAGE_BUFFER: usize = 16;

/// AuthorizationGateway backed by HTTP calls to the backend API.
///
/// The gateway itself cannot open windows or receive postMessage events;
/// the embedding shell injects a [`WindowOpener`] and forwards incoming
/// messages through [`HttpGateway::deliver`].
pub struct HttpGateway {
    http_client: Client,
    base_url: String,
    opener: WindowOpener,
    messages: broadcast::Sender<FlowMessage>,
}

impl Clone for HttpGateway {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            opener: self.opener.clone(),
            messages: self.messages.clone(),
        }
    }
}

impl HttpGateway {
    pub fn new(base_url: &str, opener: WindowOpener) -> Self {
        let (messages, _) = broadcast::channel(MESSAGE_BUFFER);
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            opener,
            messages,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Feed a cross-window message into the gateway. The embedding shell
    /// calls this for every message event it receives; delivery with no
    /// handshake listening is silently dropped, matching how browsers
    /// treat messages with no registered listener.
    pub fn deliver(&self, message: FlowMessage) {
        let _ = self.messages.send(message);
    }
}

#[derive(Debug, Deserialize)]
struct StartAuthorizationResponse {
    url: Option<String>,
}

#[async_trait]
impl AuthorizationGateway for HttpGateway {
    async fn start_authorization(&self, path: &str) -> Result<String> {
        debug!(path = path, "requesting authorization URL");

        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Gateway(format!(
                "authorization start returned {}",
                response.status()
            )));
        }

        let start: StartAuthorizationResponse = response.json().await?;
        match start.url {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(Error::Gateway(
                "authorization response missing url".to_string(),
            )),
        }
    }

    fn open_window(&self, url: &str, geometry: WindowGeometry) -> Option<PopupHandle> {
        (self.opener)(url, geometry)
    }

    fn subscribe(&self) -> broadcast::Receiver<FlowMessage> {
        self.messages.subscribe()
    }

    async fn reconcile(&self, path: &str) -> Result<()> {
        debug!(path = path, "reconciling after confirmed handshake");

        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Gateway(format!(
                "reconciliation returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opener_always(handle: PopupHandle) -> WindowOpener {
        Arc::new(move |_url, _geometry| Some(handle.clone()))
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gateway = HttpGateway::new("http://localhost:3000/", opener_always(PopupHandle::new()));
        assert_eq!(gateway.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_open_window_goes_through_opener() {
        let handle = PopupHandle::new();
        let gateway = HttpGateway::new("http://localhost:3000", opener_always(handle.clone()));

        let opened = gateway
            .open_window("https://accounts.example.com/authorize", WindowGeometry::default())
            .unwrap();
        opened.mark_closed();
        assert!(handle.is_closed());
    }

    #[test]
    fn test_open_window_blocked() {
        let gateway = HttpGateway::new("http://localhost:3000", Arc::new(|_url, _geometry| None));
        assert!(gateway
            .open_window("https://accounts.example.com/authorize", WindowGeometry::default())
            .is_none());
    }

    #[test]
    fn test_deliver_without_listener_is_dropped() {
        let gateway = HttpGateway::new("http://localhost:3000", opener_always(PopupHandle::new()));
        // No subscriber yet; must not panic or error.
        gateway.deliver(FlowMessage::completed("calendar-oauth-complete"));
    }

    #[tokio::test]
    async fn test_deliver_reaches_subscriber() {
        let gateway = HttpGateway::new("http://localhost:3000", opener_always(PopupHandle::new()));
        let mut messages = gateway.subscribe();

        gateway.deliver(FlowMessage::completed("google-oauth-complete"));

        let received = messages.recv().await.unwrap();
        assert_eq!(received.flow, "google-oauth-complete");
        assert!(received.ok);
    }
}
