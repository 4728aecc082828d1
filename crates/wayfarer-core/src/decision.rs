//! Decision source traits and the human input queue.
//!
//! Every turn the driver asks a [`TurnDecisionSource`] what the player does;
//! during an AI negotiation it asks a [`TradeDecisionSource`] how to answer
//! the trader. The sources could be the remote decision service, a human at
//! the keyboard, or a test stub.
//!
//! Both traits return futures instead of using `async fn` so the `Send`
//! bound is part of the contract. Sources are used through generics, never
//! as trait objects.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::warn;
use wayfarer_types::{Decision, DecisionRequest, TradeAction, TradeDecisionRequest};

/// Errors raised when feeding the human input queue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// The turn driver has gone away.
    #[error("human input queue is closed")]
    QueueClosed,

    /// Decisions are arriving faster than turns are played.
    #[error("human input queue is full")]
    QueueFull,
}

/// A source of turn decisions.
///
/// Implementations never fail: transport problems resolve to the source's
/// fallback decision, and [`Decision::Invalid`] is reserved for missing
/// player or map state.
pub trait TurnDecisionSource {
    /// Decide what the player does this turn.
    fn decide_turn(&mut self, request: &DecisionRequest) -> impl Future<Output = Decision> + Send;
}

/// A source of trade decisions for AI-controlled negotiations.
pub trait TradeDecisionSource {
    /// Answer the offer on the table (`None` in the opening round).
    ///
    /// Implementations resolve every failure to [`TradeAction::Reject`].
    fn decide_trade(&mut self, request: &TradeDecisionRequest) -> impl Future<Output = TradeAction> + Send;
}

/// Create a connected human input queue and decision source.
///
/// `capacity` is the number of decisions that may be queued ahead of the
/// turn loop; it is raised to at least one.
pub fn human_input(capacity: usize) -> (HumanInputQueue, HumanDecisionSource) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (HumanInputQueue { sender }, HumanDecisionSource { receiver })
}

/// The presentation layer's handle for pushing human decisions.
#[derive(Debug, Clone)]
pub struct HumanInputQueue {
    sender: mpsc::Sender<Decision>,
}

impl HumanInputQueue {
    /// Queue a decision without waiting.
    pub fn submit(&self, decision: Decision) -> Result<(), DecisionError> {
        self.sender.try_send(decision).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DecisionError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DecisionError::QueueClosed,
        })
    }

    /// Queue a decision, waiting for room.
    pub async fn send(&self, decision: Decision) -> Result<(), DecisionError> {
        self.sender
            .send(decision)
            .await
            .map_err(|_closed| DecisionError::QueueClosed)
    }
}

/// Turn decisions typed in by a human.
#[derive(Debug)]
pub struct HumanDecisionSource {
    receiver: mpsc::Receiver<Decision>,
}

impl TurnDecisionSource for HumanDecisionSource {
    async fn decide_turn(&mut self, _request: &DecisionRequest) -> Decision {
        if let Some(decision) = self.receiver.recv().await {
            decision
        } else {
            warn!("Human input queue closed, turn is invalid");
            Decision::Invalid
        }
    }
}

/// A turn source that always rests and a trade source that always rejects.
///
/// Used to exercise the turn loop without a decision service.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleDecisionSource;

impl IdleDecisionSource {
    /// Create a new idle decision source.
    pub const fn new() -> Self {
        Self
    }
}

impl TurnDecisionSource for IdleDecisionSource {
    async fn decide_turn(&mut self, _request: &DecisionRequest) -> Decision {
        Decision::Rest
    }
}

impl TradeDecisionSource for IdleDecisionSource {
    async fn decide_trade(&mut self, _request: &TradeDecisionRequest) -> TradeAction {
        TradeAction::Reject
    }
}
