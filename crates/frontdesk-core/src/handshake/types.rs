//! Shared types for the authorization handshake protocol.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long a handshake waits for a completion message before giving up
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// How often the driver checks whether the popup was closed by hand
pub const CLOSE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Cross-window message posted by the popup's final redirect page.
///
/// The wire shape follows the browser postMessage convention: a `type`
/// field carrying the flow discriminator plus a success indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMessage {
    /// Flow discriminator, e.g. "calendar-oauth-complete"
    #[serde(rename = "type")]
    pub flow: String,
    /// Whether the popup's final page reported success
    #[serde(default = "default_true")]
    pub ok: bool,
}

fn default_true() -> bool {
    true
}

impl FlowMessage {
    pub fn completed(flow: &str) -> Self {
        Self {
            flow: flow.to_string(),
            ok: true,
        }
    }
}

/// Placement of the authorization popup window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
}

impl WindowGeometry {
    /// Geometry centered on a screen of the given dimensions
    pub fn centered(width: u32, height: u32, screen_width: u32, screen_height: u32) -> Self {
        Self {
            width,
            height,
            left: (screen_width.saturating_sub(width) / 2) as i32,
            top: (screen_height.saturating_sub(height) / 2) as i32,
        }
    }
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 500,
            height: 650,
            left: 0,
            top: 0,
        }
    }
}

/// Handle to an open popup window, shared between the driver and the
/// embedding shell that actually owns the OS window.
///
/// The shell marks the handle closed when the user dismisses the window;
/// the driver raises a close request when the handshake settles and the
/// window should go away.
#[derive(Debug, Clone, Default)]
pub struct PopupHandle {
    state: Arc<PopupState>,
}

#[derive(Debug, Default)]
struct PopupState {
    closed: AtomicBool,
    close_requested: AtomicBool,
}

impl PopupHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the window is gone, whatever closed it
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Record that the OS window closed (called by the embedding shell)
    pub fn mark_closed(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }

    /// Ask the embedding shell to close the window
    pub fn request_close(&self) {
        self.state.close_requested.store(true, Ordering::SeqCst);
    }

    /// True once the driver has asked for the window to close
    pub fn close_requested(&self) -> bool {
        self.state.close_requested.load(Ordering::SeqCst)
    }
}

/// Observable lifecycle of a running handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandshakePhase {
    Idle,
    Opening,
    AwaitingConfirmation,
    Succeeded,
    Failed,
}

/// How a handshake settled. Exactly one of these is produced per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HandshakeOutcome {
    /// The popup posted the matching completion message
    Confirmed,
    /// The authorization URL could not be obtained
    InitiationFailed { detail: String },
    /// The embedding shell refused to open the window
    PopupBlocked,
    /// No completion message arrived within the flow's timeout
    TimedOut,
    /// The user closed the popup before completing authorization
    ManuallyClosed,
}

impl HandshakeOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// Human-readable failure reason, `None` when confirmed
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Confirmed => None,
            Self::InitiationFailed { detail } => Some(detail),
            Self::PopupBlocked => Some("popup blocked - enable popups for this site"),
            Self::TimedOut => Some("timed out"),
            Self::ManuallyClosed => Some("closed before completion"),
        }
    }
}

/// Result of the optional post-confirmation reconciliation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconciliationStatus {
    Completed,
    Failed { detail: String },
}

/// Final report for a settled handshake.
///
/// Reconciliation is secondary: a failed reconciliation never demotes a
/// confirmed outcome, it is just surfaced here for the caller to act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeReport {
    pub outcome: HandshakeOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation: Option<ReconciliationStatus>,
}

impl HandshakeReport {
    /// True when the authorization itself went through
    pub fn ok(&self) -> bool {
        self.outcome.is_confirmed()
    }

    pub fn reason(&self) -> Option<&str> {
        self.outcome.reason()
    }
}

/// Everything that parameterizes one authorization flow.
///
/// A flow names the backend path that mints the authorization URL, the
/// message discriminator its popup posts on completion, and optionally a
/// backend path to reconcile local state once the handshake confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSpec {
    pub start_path: String,
    pub discriminator: String,
    pub reconcile_path: Option<String>,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub geometry: WindowGeometry,
}

impl FlowSpec {
    pub fn new(start_path: &str, discriminator: &str) -> Self {
        Self {
            start_path: start_path.to_string(),
            discriminator: discriminator.to_string(),
            reconcile_path: None,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: CLOSE_POLL_INTERVAL,
            geometry: WindowGeometry::default(),
        }
    }

    pub fn with_reconcile_path(mut self, path: &str) -> Self {
        self.reconcile_path = Some(path.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_geometry(mut self, geometry: WindowGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Calendar connection flow: grants booking access, then asks the
    /// backend to sync the freshly linked calendar.
    pub fn calendar_connect() -> Self {
        Self::new("/api/calendar/oauth/start", "calendar-oauth-complete")
            .with_reconcile_path("/api/calendar/oauth/reconcile")
    }

    /// Google sign-in flow: session comes back through the popup itself,
    /// so there is nothing to reconcile afterwards.
    pub fn google_signin() -> Self {
        Self::new("/api/google/oauth/start", "google-oauth-complete")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_message_wire_format() {
        let message = FlowMessage::completed("calendar-oauth-complete");
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"type":"calendar-oauth-complete","ok":true}"#);
    }

    #[test]
    fn test_flow_message_ok_defaults_to_true() {
        let message: FlowMessage =
            serde_json::from_str(r#"{"type":"google-oauth-complete"}"#).unwrap();
        assert_eq!(message.flow, "google-oauth-complete");
        assert!(message.ok);
    }

    #[test]
    fn test_geometry_centered() {
        let geometry = WindowGeometry::centered(500, 650, 1920, 1080);
        assert_eq!(geometry.left, 710);
        assert_eq!(geometry.top, 215);
    }

    #[test]
    fn test_geometry_centered_on_tiny_screen() {
        // Popup larger than the screen pins to the origin instead of
        // going negative.
        let geometry = WindowGeometry::centered(500, 650, 400, 300);
        assert_eq!(geometry.left, 0);
        assert_eq!(geometry.top, 0);
    }

    #[test]
    fn test_popup_handle_close_tracking() {
        let handle = PopupHandle::new();
        assert!(!handle.is_closed());
        assert!(!handle.close_requested());

        handle.request_close();
        assert!(handle.close_requested());
        assert!(!handle.is_closed());

        handle.mark_closed();
        assert!(handle.is_closed());
    }

    #[test]
    fn test_popup_handle_clones_share_state() {
        let handle = PopupHandle::new();
        let shell_side = handle.clone();
        shell_side.mark_closed();
        assert!(handle.is_closed());
    }

    #[test]
    fn test_outcome_reasons() {
        assert_eq!(HandshakeOutcome::Confirmed.reason(), None);
        assert_eq!(HandshakeOutcome::TimedOut.reason(), Some("timed out"));
        assert_eq!(
            HandshakeOutcome::ManuallyClosed.reason(),
            Some("closed before completion")
        );
        assert_eq!(
            HandshakeOutcome::PopupBlocked.reason(),
            Some("popup blocked - enable popups for this site")
        );
        let failed = HandshakeOutcome::InitiationFailed {
            detail: "authorization start returned 500".to_string(),
        };
        assert_eq!(failed.reason(), Some("authorization start returned 500"));
    }

    #[test]
    fn test_report_ok_ignores_reconciliation() {
        let report = HandshakeReport {
            outcome: HandshakeOutcome::Confirmed,
            reconciliation: Some(ReconciliationStatus::Failed {
                detail: "sync failed".to_string(),
            }),
        };
        assert!(report.ok());
        assert_eq!(report.reason(), None);
    }

    #[test]
    fn test_flow_spec_defaults() {
        let flow = FlowSpec::new("/api/calendar/oauth/start", "calendar-oauth-complete");
        assert_eq!(flow.timeout, DEFAULT_TIMEOUT);
        assert_eq!(flow.poll_interval, CLOSE_POLL_INTERVAL);
        assert_eq!(flow.reconcile_path, None);
        assert_eq!(flow.geometry, WindowGeometry::default());
    }

    #[test]
    fn test_canned_flows() {
        let calendar = FlowSpec::calendar_connect();
        assert_eq!(calendar.start_path, "/api/calendar/oauth/start");
        assert_eq!(calendar.discriminator, "calendar-oauth-complete");
        assert_eq!(
            calendar.reconcile_path.as_deref(),
            Some("/api/calendar/oauth/reconcile")
        );

        let signin = FlowSpec::google_signin();
        assert_eq!(signin.start_path, "/api/google/oauth/start");
        assert_eq!(signin.discriminator, "google-oauth-complete");
        assert_eq!(signin.reconcile_path, None);
    }

    #[test]
    fn test_flow_spec_builders() {
        let flow = FlowSpec::google_signin()
            .with_timeout(Duration::from_secs(60))
            .with_poll_interval(Duration::from_millis(100))
            .with_geometry(WindowGeometry::centered(500, 650, 1920, 1080));
        assert_eq!(flow.timeout, Duration::from_secs(60));
        assert_eq!(flow.poll_interval, Duration::from_millis(100));
        assert_eq!(flow.geometry.left, 710);
    }
}
