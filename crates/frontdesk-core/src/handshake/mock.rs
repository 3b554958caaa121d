//! Scriptable mock gateway for testing the handshake driver.

use crate::handshake::types::{FlowMessage, PopupHandle, WindowGeometry};
use crate::handshake::AuthorizationGateway;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

const MOCK_AUTHORIZATION_URL: &str = "https://accounts.example.com/o/oauth2/auth?mock=1";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock gateway with scriptable behavior.
///
/// Defaults to the happy path: authorization starts succeed, popups open,
/// reconciliation succeeds. Clones share the same state, so a test can
/// keep one handle for scripting while the driver owns another.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<MockState>,
}

struct MockState {
    start_failure: Mutex<Option<String>>,
    popup_blocked: AtomicBool,
    complete_on_open: Mutex<Option<FlowMessage>>,
    reconcile_failure: Mutex<Option<String>>,
    messages: broadcast::Sender<FlowMessage>,
    opened: Mutex<Vec<(String, PopupHandle)>>,
    start_calls: AtomicU32,
    reconcile_calls: AtomicU32,
}

impl Default for MockState {
    fn default() -> Self {
        let (messages, _) = broadcast::channel(16);
        Self {
            start_failure: Mutex::new(None),
            popup_blocked: AtomicBool::new(false),
            complete_on_open: Mutex::new(None),
            reconcile_failure: Mutex::new(None),
            messages,
            opened: Mutex::new(Vec::new()),
            start_calls: AtomicU32::new(0),
            reconcile_calls: AtomicU32::new(0),
        }
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the authorization start to fail with the given detail
    pub fn fail_start(&self, detail: &str) {
        *lock(&self.state.start_failure) = Some(detail.to_string());
    }

    /// Script the popup to be blocked
    pub fn block_popup(&self) {
        self.state.popup_blocked.store(true, Ordering::SeqCst);
    }

    /// Script a completion message to arrive as soon as the popup opens
    pub fn complete_on_open(&self, flow: &str) {
        *lock(&self.state.complete_on_open) = Some(FlowMessage::completed(flow));
    }

    /// Script reconciliation to fail with the given detail
    pub fn fail_reconcile(&self, detail: &str) {
        *lock(&self.state.reconcile_failure) = Some(detail.to_string());
    }

    /// Deliver a cross-window message to whoever is listening. Delivery
    /// with no listener is silently dropped, like a browser message event
    /// with no registered handler.
    pub fn send_message(&self, message: FlowMessage) {
        let _ = self.state.messages.send(message);
    }

    /// Handle of the most recently opened popup
    pub fn last_popup(&self) -> Option<PopupHandle> {
        lock(&self.state.opened)
            .last()
            .map(|(_, handle)| handle.clone())
    }

    /// URLs the gateway was asked to open, in order
    pub fn opened_urls(&self) -> Vec<String> {
        lock(&self.state.opened)
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn start_calls(&self) -> u32 {
        self.state.start_calls.load(Ordering::SeqCst)
    }

    pub fn reconcile_calls(&self) -> u32 {
        self.state.reconcile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationGateway for MockGateway {
    async fn start_authorization(&self, _path: &str) -> Result<String> {
        self.state.start_calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.state.start_failure).as_ref() {
            Some(detail) => Err(Error::Gateway(detail.clone())),
            None => Ok(MOCK_AUTHORIZATION_URL.to_string()),
        }
    }

    fn open_window(&self, url: &str, _geometry: WindowGeometry) -> Option<PopupHandle> {
        if self.state.popup_blocked.load(Ordering::SeqCst) {
            return None;
        }

        let handle = PopupHandle::new();
        lock(&self.state.opened).push((url.to_string(), handle.clone()));

        if let Some(message) = lock(&self.state.complete_on_open).clone() {
            self.send_message(message);
        }

        Some(handle)
    }

    fn subscribe(&self) -> broadcast::Receiver<FlowMessage> {
        self.state.messages.subscribe()
    }

    async fn reconcile(&self, _path: &str) -> Result<()> {
        self.state.reconcile_calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.state.reconcile_failure).as_ref() {
            Some(detail) => Err(Error::Gateway(detail.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_start_returns_url() {
        let mock = MockGateway::new();
        let url = mock
            .start_authorization("/api/calendar/oauth/start")
            .await
            .unwrap();
        assert_eq!(url, MOCK_AUTHORIZATION_URL);
        assert_eq!(mock.start_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_scripted_start_failure() {
        let mock = MockGateway::new();
        mock.fail_start("authorization start returned 500 Internal Server Error");

        let result = mock.start_authorization("/api/calendar/oauth/start").await;
        assert!(result.is_err());
        assert_eq!(mock.start_calls(), 1);
    }

    #[test]
    fn test_mock_blocked_popup() {
        let mock = MockGateway::new();
        mock.block_popup();
        assert!(mock
            .open_window(MOCK_AUTHORIZATION_URL, WindowGeometry::default())
            .is_none());
        assert!(mock.opened_urls().is_empty());
    }

    #[test]
    fn test_mock_records_opened_windows() {
        let mock = MockGateway::new();
        let handle = mock
            .open_window(MOCK_AUTHORIZATION_URL, WindowGeometry::default())
            .unwrap();
        assert_eq!(mock.opened_urls(), vec![MOCK_AUTHORIZATION_URL.to_string()]);

        handle.mark_closed();
        assert!(mock.last_popup().unwrap().is_closed());
    }

    #[tokio::test]
    async fn test_mock_message_delivery() {
        let mock = MockGateway::new();
        let mut messages = mock.subscribe();

        mock.send_message(FlowMessage::completed("calendar-oauth-complete"));

        let received = messages.recv().await.unwrap();
        assert_eq!(received.flow, "calendar-oauth-complete");
    }

    #[tokio::test]
    async fn test_mock_reconcile_counters() {
        let mock = MockGateway::new();
        assert!(mock.reconcile("/api/calendar/oauth/reconcile").await.is_ok());

        mock.fail_reconcile("calendar sync unavailable");
        assert!(mock.reconcile("/api/calendar/oauth/reconcile").await.is_err());
        assert_eq!(mock.reconcile_calls(), 2);
    }
}
