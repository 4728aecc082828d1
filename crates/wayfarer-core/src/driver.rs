//! Session-scoped async drivers.
//!
//! The negotiation machine is synchronous; these drivers own its suspension
//! points. Each await (a decision service round trip, the haggle stop
//! signal) races against the session's [`Cancellation`], so a session torn
//! down mid-await never applies the late result.

use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};
use wayfarer_trade::{HaggleBar, HaggleResult};
use wayfarer_types::TradeAction;

use crate::decision::TradeDecisionSource;
use crate::negotiation::{Effect, Negotiation, TradeOutcome};

// ---------------------------------------------------------------------------
// Session lifetime
// ---------------------------------------------------------------------------

/// Owner side of a session's lifetime.
///
/// Ending or dropping it cancels every [`Cancellation`] cloned from it.
#[derive(Debug)]
pub struct SessionLifetime {
    ended: watch::Sender<bool>,
}

impl SessionLifetime {
    /// Create a live session and its cancellation token.
    pub fn new() -> (Self, Cancellation) {
        let (ended, receiver) = watch::channel(false);
        (Self { ended }, Cancellation { receiver })
    }

    /// Tear the session down.
    pub fn end(self) {
        // Receivers also observe the drop, so a send with no receivers is fine.
        let _ = self.ended.send(true);
    }
}

/// Observer side of a session's lifetime.
#[derive(Debug, Clone)]
pub struct Cancellation {
    receiver: watch::Receiver<bool>,
}

impl Cancellation {
    /// Whether the session has been torn down.
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow() || self.receiver.has_changed().is_err()
    }

    /// Resolve once the session is torn down.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        // `wait_for` errors only when the owner is dropped, which also ends the session.
        let _ = receiver.wait_for(|ended| *ended).await;
    }
}

// ---------------------------------------------------------------------------
// AI negotiation
// ---------------------------------------------------------------------------

/// Result of driving an AI negotiation.
#[derive(Debug, Clone, PartialEq)]
pub enum DriveOutcome {
    /// The negotiation reached a terminal state.
    Finished {
        /// How it ended.
        outcome: TradeOutcome,
        /// Every effect emitted along the way, in order.
        effects: Vec<Effect>,
    },
    /// The session was torn down while awaiting the decision service.
    Cancelled {
        /// Effects emitted before cancellation.
        effects: Vec<Effect>,
    },
}

/// Drives AI negotiations against a [`TradeDecisionSource`].
///
/// At most one decision request is in flight at a time. Each request is
/// bounded by `decision_timeout`; a request that overruns is treated as
/// REJECT.
#[derive(Debug)]
pub struct AiNegotiator<'s, S> {
    source: &'s mut S,
    decision_timeout: Duration,
}

impl<'s, S: TradeDecisionSource> AiNegotiator<'s, S> {
    /// Create a negotiator over `source`.
    pub const fn new(source: &'s mut S, decision_timeout: Duration) -> Self {
        Self {
            source,
            decision_timeout,
        }
    }

    /// Run the negotiation until it ends or the session is cancelled.
    pub async fn drive(&mut self, negotiation: &mut Negotiation<'_>, cancellation: &Cancellation) -> DriveOutcome {
        let mut effects = Vec::new();

        while let Some(request) = negotiation.pending_ai_request() {
            if cancellation.is_cancelled() {
                return Self::cancelled(negotiation, effects);
            }

            let action = tokio::select! {
                () = cancellation.cancelled() => {
                    return Self::cancelled(negotiation, effects);
                }
                result = timeout(self.decision_timeout, self.source.decide_trade(&request)) => {
                    result.unwrap_or_else(|_elapsed| {
                        warn!(
                            session_id = %negotiation.session().id(),
                            timeout_ms = self.decision_timeout.as_millis(),
                            "Trade decision timed out, rejecting"
                        );
                        TradeAction::Reject
                    })
                }
            };

            match negotiation.apply_ai_action(action) {
                Ok(round_effects) => effects.extend(round_effects),
                Err(error) => {
                    warn!(%error, "Negotiation refused AI action");
                    break;
                }
            }
        }

        match negotiation.outcome() {
            Some(outcome) => DriveOutcome::Finished {
                outcome: outcome.clone(),
                effects,
            },
            None => Self::cancelled(negotiation, effects),
        }
    }

    fn cancelled(negotiation: &Negotiation<'_>, effects: Vec<Effect>) -> DriveOutcome {
        info!(
            session_id = %negotiation.session().id(),
            round = negotiation.round_count(),
            "Session ended mid-negotiation, discarding pending decision"
        );
        DriveOutcome::Cancelled { effects }
    }
}

// ---------------------------------------------------------------------------
// Haggle round
// ---------------------------------------------------------------------------

/// The player's stop button for a running haggle.
#[derive(Debug)]
pub struct HaggleStop {
    sender: oneshot::Sender<()>,
}

impl HaggleStop {
    /// Stop the handle now.
    pub fn stop(self) {
        // The round may already be gone if the session ended.
        let _ = self.sender.send(());
    }
}

/// A running haggle minigame awaiting the stop signal.
#[derive(Debug)]
pub struct HaggleRound {
    bar: HaggleBar,
    started: Instant,
    stop: oneshot::Receiver<()>,
}

impl HaggleRound {
    /// Start the handle moving.
    pub fn start(bar: HaggleBar) -> (Self, HaggleStop) {
        let (sender, stop) = oneshot::channel();
        let round = Self {
            bar,
            started: Instant::now(),
            stop,
        };
        (round, HaggleStop { sender })
    }

    /// The bar being played.
    pub const fn bar(&self) -> &HaggleBar {
        &self.bar
    }

    /// Wait for the stop signal and score the handle where it stopped.
    ///
    /// Returns `None` if the session is torn down or the stop button is
    /// dropped before being pressed.
    pub async fn finish(self, cancellation: &Cancellation) -> Option<HaggleResult> {
        tokio::select! {
            () = cancellation.cancelled() => {
                debug!("Session ended during haggle");
                None
            }
            stopped = self.stop => {
                stopped.ok()?;
                let elapsed = self.started.elapsed().as_secs_f64();
                let result = self.bar.stop_at(elapsed);
                debug!(
                    elapsed,
                    position = self.bar.position_at(elapsed),
                    result = %result,
                    "Haggle stopped"
                );
                Some(result)
            }
        }
    }
}
