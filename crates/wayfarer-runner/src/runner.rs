//! Headless play loop: one AI turn after another against the world.
//!
//! Each turn the decision source picks an action, the turn driver resolves
//! it, and moves are applied to the [`HeadlessWorld`]. Trades run to
//! completion inside the turn. The loop ends early when the session is
//! torn down.

use tracing::{debug, info, warn};
use wayfarer_core::{
    Cancellation, DriveOutcome, GameConfig, TradeDecisionSource, TradeOutcome, TurnDecisionSource, TurnDriver,
    TurnOutcome,
};
use wayfarer_trade::ResourceLedger;
use wayfarer_types::ResourceKind;

use crate::world::HeadlessWorld;

/// Tally of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Turns actually played.
    pub turns: u32,
    /// Steps taken.
    pub moves: u32,
    /// Turns spent resting.
    pub rests: u32,
    /// Trades settled.
    pub trades_completed: u32,
    /// Negotiations that ended without a trade.
    pub trades_rejected: u32,
    /// Trade requests with nobody to trade with.
    pub wasted: u32,
    /// Turns aborted on a precondition failure.
    pub invalid: u32,
}

/// Plays AI turns against a [`HeadlessWorld`].
#[derive(Debug)]
pub struct HeadlessRunner<S> {
    driver: TurnDriver,
    source: S,
    world: HeadlessWorld,
    ledger: ResourceLedger,
}

impl<S> HeadlessRunner<S>
where
    S: TurnDecisionSource + TradeDecisionSource,
{
    /// Create a runner with a fresh wallet from `config`.
    pub fn new(config: &GameConfig, source: S, world: HeadlessWorld) -> Self {
        Self {
            driver: TurnDriver::new(config),
            source,
            world,
            ledger: config.player.new_ledger(),
        }
    }

    /// The player's wallet.
    pub const fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// The world being played.
    pub const fn world(&self) -> &HeadlessWorld {
        &self.world
    }

    /// Play up to `turns` turns.
    pub async fn run(&mut self, turns: u32, cancellation: &Cancellation) -> RunSummary {
        let mut summary = RunSummary::default();

        while summary.turns < turns {
            if cancellation.is_cancelled() {
                info!(turns = summary.turns, "Session ended, stopping run");
                break;
            }

            let outcome = self
                .driver
                .play_ai_turn(&mut self.ledger, &mut self.world, &mut self.source, cancellation)
                .await;
            summary.turns = summary.turns.saturating_add(1);
            self.record(&outcome, &mut summary);

            debug!(
                turn = summary.turns,
                food = self.ledger.get(ResourceKind::Food),
                water = self.ledger.get(ResourceKind::Water),
                energy = self.ledger.get(ResourceKind::Energy),
                gold = self.ledger.get(ResourceKind::Gold),
                "Turn finished"
            );
        }

        info!(
            turns = summary.turns,
            moves = summary.moves,
            rests = summary.rests,
            trades_completed = summary.trades_completed,
            trades_rejected = summary.trades_rejected,
            "Run finished"
        );
        summary
    }

    fn record(&mut self, outcome: &TurnOutcome, summary: &mut RunSummary) {
        match outcome {
            TurnOutcome::Moved(direction) => {
                if self.world.step(*direction, &mut self.ledger) {
                    summary.moves = summary.moves.saturating_add(1);
                } else {
                    warn!(direction = direction.as_str(), "Step left the grid, ignored");
                }
            }
            TurnOutcome::Rested { .. } => summary.rests = summary.rests.saturating_add(1),
            TurnOutcome::Traded(DriveOutcome::Finished {
                outcome: TradeOutcome::Completed(receipt),
                ..
            }) => {
                info!(
                    session_id = %receipt.session_id,
                    offer = %receipt.offer,
                    discount = receipt.discount,
                    "Trade settled"
                );
                summary.trades_completed = summary.trades_completed.saturating_add(1);
            }
            TurnOutcome::Traded(DriveOutcome::Finished {
                outcome: TradeOutcome::Rejected(reason),
                ..
            }) => {
                info!(%reason, "Trade rejected");
                summary.trades_rejected = summary.trades_rejected.saturating_add(1);
            }
            TurnOutcome::Traded(DriveOutcome::Cancelled { .. }) => {
                info!("Trade abandoned by session teardown");
            }
            // The AI driver negotiates in place, so this only shows up for
            // sources that cannot answer trades.
            TurnOutcome::TradeAvailable => {}
            TurnOutcome::Wasted => summary.wasted = summary.wasted.saturating_add(1),
            TurnOutcome::Invalid => summary.invalid = summary.invalid.saturating_add(1),
        }
    }
}
