//! Drives an authorization handshake from start to settled outcome.

use crate::handshake::types::{
    FlowMessage, FlowSpec, HandshakeOutcome, HandshakePhase, HandshakeReport, PopupHandle,
    ReconciliationStatus,
};
use crate::handshake::{AuthorizationGateway, GatewayClient};
use crate::{Error, Result};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Run a handshake to completion on the current task.
///
/// Settles on exactly one outcome per attempt: the first of completion
/// message, manual close, or timeout wins, and later events are ignored.
pub async fn run<G>(gateway: &G, flow: &FlowSpec) -> HandshakeReport
where
    G: AuthorizationGateway + ?Sized,
{
    drive(gateway, flow, None).await
}

fn set_phase(phase: Option<&watch::Sender<HandshakePhase>>, value: HandshakePhase) {
    if let Some(sender) = phase {
        let _ = sender.send(value);
    }
}

pub(crate) async fn drive<G>(
    gateway: &G,
    flow: &FlowSpec,
    phase: Option<&watch::Sender<HandshakePhase>>,
) -> HandshakeReport
where
    G: AuthorizationGateway + ?Sized,
{
    set_phase(phase, HandshakePhase::Opening);

    let url = match gateway.start_authorization(&flow.start_path).await {
        Ok(url) => url,
        Err(e) => {
            warn!(flow = %flow.discriminator, error = %e, "authorization start failed");
            set_phase(phase, HandshakePhase::Failed);
            return HandshakeReport {
                outcome: HandshakeOutcome::InitiationFailed {
                    detail: e.to_string(),
                },
                reconciliation: None,
            };
        }
    };
    debug!(flow = %flow.discriminator, "authorization URL obtained");

    // Subscribe before opening the window so a completion posted the
    // instant the popup loads cannot slip past the listener.
    let mut messages = gateway.subscribe();

    let Some(popup) = gateway.open_window(&url, flow.geometry) else {
        warn!(flow = %flow.discriminator, "popup blocked");
        set_phase(phase, HandshakePhase::Failed);
        return HandshakeReport {
            outcome: HandshakeOutcome::PopupBlocked,
            reconciliation: None,
        };
    };

    set_phase(phase, HandshakePhase::AwaitingConfirmation);

    let outcome = await_confirmation(&mut messages, &popup, flow).await;

    // Reconciliation is secondary: a confirmed handshake stays confirmed
    // even when the follow-up call fails.
    let reconciliation = match (&outcome, &flow.reconcile_path) {
        (HandshakeOutcome::Confirmed, Some(path)) => Some(match gateway.reconcile(path).await {
            Ok(()) => ReconciliationStatus::Completed,
            Err(e) => {
                warn!(flow = %flow.discriminator, error = %e, "reconciliation failed after confirmation");
                ReconciliationStatus::Failed {
                    detail: e.to_string(),
                }
            }
        }),
        _ => None,
    };

    match &outcome {
        HandshakeOutcome::Confirmed => {
            info!(flow = %flow.discriminator, "handshake confirmed");
            set_phase(phase, HandshakePhase::Succeeded);
        }
        other => {
            info!(flow = %flow.discriminator, reason = other.reason().unwrap_or(""), "handshake failed");
            set_phase(phase, HandshakePhase::Failed);
        }
    }

    HandshakeReport {
        outcome,
        reconciliation,
    }
}

/// Wait for the first settling event: a matching completion message, the
/// popup closing, or the flow's timeout elapsing.
async fn await_confirmation(
    messages: &mut broadcast::Receiver<FlowMessage>,
    popup: &PopupHandle,
    flow: &FlowSpec,
) -> HandshakeOutcome {
    let timeout = tokio::time::sleep(flow.timeout);
    tokio::pin!(timeout);
    let mut poll = tokio::time::interval(flow.poll_interval);
    let mut listening = true;

    loop {
        tokio::select! {
            message = messages.recv(), if listening => match message {
                Ok(message) if message.flow == flow.discriminator => {
                    if !message.ok {
                        warn!(flow = %flow.discriminator, "completion message reported failure");
                    }
                    popup.request_close();
                    return HandshakeOutcome::Confirmed;
                }
                // Message for some other listener; keep waiting.
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(flow = %flow.discriminator, skipped, "message listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    listening = false;
                }
            },
            _ = &mut timeout => {
                if !popup.is_closed() {
                    popup.request_close();
                }
                return HandshakeOutcome::TimedOut;
            }
            _ = poll.tick() => {
                if popup.is_closed() {
                    return HandshakeOutcome::ManuallyClosed;
                }
            }
        }
    }
}

/// A handshake running on the runtime, with observable phase.
///
/// Dropping the session aborts an in-flight handshake, so starting a
/// replacement session tears the previous one down first.
pub struct HandshakeSession {
    task: Option<JoinHandle<HandshakeReport>>,
    phase: watch::Receiver<HandshakePhase>,
}

impl HandshakeSession {
    /// Spawn a handshake on the current runtime
    pub fn spawn(gateway: GatewayClient, flow: FlowSpec) -> Self {
        debug!(
            gateway = gateway.gateway_name(),
            flow = %flow.discriminator,
            "starting handshake session"
        );

        let (phase_tx, phase_rx) = watch::channel(HandshakePhase::Idle);
        let task = tokio::spawn(async move { drive(&gateway, &flow, Some(&phase_tx)).await });

        Self {
            task: Some(task),
            phase: phase_rx,
        }
    }

    /// Current phase of the handshake
    pub fn phase(&self) -> HandshakePhase {
        *self.phase.borrow()
    }

    /// Watch channel for phase transitions, for callers rendering progress
    pub fn phases(&self) -> watch::Receiver<HandshakePhase> {
        self.phase.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(true)
    }

    /// Abort the handshake without waiting for an outcome
    pub fn abort(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Wait for the handshake to settle
    pub async fn wait(mut self) -> Result<HandshakeReport> {
        match self.task.take() {
            Some(task) => task.await.map_err(|_| Error::Canceled),
            None => Err(Error::Canceled),
        }
    }
}

impl Drop for HandshakeSession {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}
