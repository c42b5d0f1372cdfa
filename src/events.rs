// src/events.rs
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::display::DisplayPort;
use crate::error::{ThreatScopeError, ThreatScopeResult};
use crate::orchestrator::{CycleOutcome, ScanOrchestrator};
use crate::scan::ScanApi;

/// Input method that raised an analyze action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Button,
    EnterKey,
}

/// An analyze action travelling to the subscribed handler
#[derive(Debug)]
pub struct AnalyzeRequest {
    pub target: String,
    pub trigger: Trigger,
    reply: Option<oneshot::Sender<CycleOutcome>>,
}

/// Sending side of the analyze channel
#[derive(Clone)]
pub struct AnalyzeControls {
    sender: mpsc::UnboundedSender<AnalyzeRequest>,
}

/// Create a connected pair of controls and the receiver to subscribe with
pub fn analyze_channel() -> (AnalyzeControls, mpsc::UnboundedReceiver<AnalyzeRequest>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (AnalyzeControls { sender }, receiver)
}

impl AnalyzeControls {
    /// Activate the analyze button
    pub async fn click(&self, target: &str) -> ThreatScopeResult<CycleOutcome> {
        self.send(target, Trigger::Button).await
    }

    /// Press Enter while the target input has focus
    pub async fn press_enter(&self, target: &str) -> ThreatScopeResult<CycleOutcome> {
        self.send(target, Trigger::EnterKey).await
    }

    async fn send(&self, target: &str, trigger: Trigger) -> ThreatScopeResult<CycleOutcome> {
        let (reply, outcome) = oneshot::channel();
        let request = AnalyzeRequest {
            target: target.to_string(),
            trigger,
            reply: Some(reply),
        };

        self.sender.send(request)
            .map_err(|_| ThreatScopeError::UnexpectedError("No analyze handler is subscribed".to_string()))?;

        outcome.await
            .map_err(|_| ThreatScopeError::UnexpectedError("Analyze handler stopped before replying".to_string()))
    }
}

/// Handle returned by [`subscribe`]; dropping it stops the listener
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Route every analyze action, whatever its trigger, to `orchestrator.analyze`.
/// Each action runs in its own task so the orchestrator's overlap policy decides
/// what happens to concurrent actions.
pub fn subscribe<A, D>(
    orchestrator: Arc<ScanOrchestrator<A, D>>,
    mut receiver: mpsc::UnboundedReceiver<AnalyzeRequest>,
) -> Subscription
where
    A: ScanApi + 'static,
    D: DisplayPort + 'static,
{
    let handle = tokio::spawn(async move {
        while let Some(mut request) = receiver.recv().await {
            debug!("Analyze action via {:?}", request.trigger);
            let orchestrator = orchestrator.clone();
            let reply = request.reply.take();

            tokio::spawn(async move {
                let outcome = orchestrator.analyze(&request.target).await;
                if let Some(reply) = reply {
                    if reply.send(outcome).is_err() {
                        warn!("Analyze caller went away before the {:?} outcome arrived", outcome);
                    }
                }
            });
        }
        debug!("Analyze channel closed");
    });

    Subscription { handle }
}
