//! One turn of play: ask for a decision, then resolve it.
//!
//! The map is an external collaborator reached through [`TileLookup`]. Moves
//! are handed back to it through [`TurnOutcome::Moved`]; resting and trading
//! are resolved here against the wallet.

use std::time::Duration;

use tracing::{debug, info, warn};
use wayfarer_trade::{ResourceLedger, Trader};
use wayfarer_types::{Decision, DecisionRequest, Direction, MapPosition, ResourceKind, TileSummary};

use crate::config::{GameConfig, TurnConfig};
use crate::decision::{TradeDecisionSource, TurnDecisionSource};
use crate::driver::{AiNegotiator, Cancellation, DriveOutcome};
use crate::negotiation::{Negotiation, NegotiationRules, PlayerMode};

/// What the turn driver needs from the map.
pub trait TileLookup {
    /// The player's position, or `None` if the player is not on the map.
    fn position(&self) -> Option<MapPosition>;

    /// The tile under the player.
    fn current_tile(&self) -> Option<&TileSummary>;

    /// The visible neighbourhood, row-major; `None` for unseen cells.
    fn nearby(&self) -> Vec<Vec<Option<TileSummary>>>;

    /// The trader on the player's tile, if any.
    fn trader_here(&mut self) -> Option<&mut Trader>;
}

/// How a turn resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The player moves; the map applies the step and its costs.
    Moved(Direction),
    /// The player rested on the current tile.
    Rested {
        /// Energy restored.
        energy_gained: u32,
        /// Food actually paid.
        food_paid: u32,
        /// Water actually paid.
        water_paid: u32,
    },
    /// A trader is here and a negotiation should start.
    TradeAvailable,
    /// An AI negotiation ran to completion or was cancelled.
    Traded(DriveOutcome),
    /// The player asked to trade with nobody here.
    Wasted,
    /// Player or map state was missing, or the decision source gave up.
    Invalid,
}

/// Resolves turns against a wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnDriver {
    turn: TurnConfig,
    rules: NegotiationRules,
    decision_timeout: Duration,
}

impl TurnDriver {
    /// Create a driver from the game configuration.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            turn: config.turn,
            rules: NegotiationRules::from_config(config),
            decision_timeout: config.decision_service.request_timeout(),
        }
    }

    /// Rules handed to every negotiation this driver starts.
    pub const fn rules(&self) -> &NegotiationRules {
        &self.rules
    }

    /// Play one turn with any decision source.
    ///
    /// A trade request on a trader's tile yields [`TurnOutcome::TradeAvailable`]
    /// so the caller can open a human negotiation.
    pub async fn play_turn<S, M>(&self, ledger: &mut ResourceLedger, map: &M, source: &mut S) -> TurnOutcome
    where
        S: TurnDecisionSource,
        M: TileLookup,
    {
        let decision = self.next_decision(ledger, map, source).await;
        self.resolve(decision, ledger, map)
    }

    /// Play one turn with a source that also answers trades.
    ///
    /// Trades are negotiated to the end before returning.
    pub async fn play_ai_turn<S, M>(
        &self,
        ledger: &mut ResourceLedger,
        map: &mut M,
        source: &mut S,
        cancellation: &Cancellation,
    ) -> TurnOutcome
    where
        S: TurnDecisionSource + TradeDecisionSource,
        M: TileLookup,
    {
        let decision = self.next_decision(ledger, map, source).await;
        let outcome = self.resolve(decision, ledger, map);
        if outcome != TurnOutcome::TradeAvailable {
            return outcome;
        }

        let Some(trader) = map.trader_here() else {
            warn!("Trader vanished before negotiation");
            return TurnOutcome::Invalid;
        };
        let (mut negotiation, _opening) = Negotiation::start(ledger, trader, PlayerMode::Ai, self.rules.clone());
        let mut negotiator = AiNegotiator::new(source, self.decision_timeout);
        TurnOutcome::Traded(negotiator.drive(&mut negotiation, cancellation).await)
    }

    async fn next_decision<S, M>(&self, ledger: &ResourceLedger, map: &M, source: &mut S) -> Decision
    where
        S: TurnDecisionSource,
        M: TileLookup,
    {
        let Some(position) = map.position() else {
            warn!("Player has no position, turn is invalid");
            return Decision::Invalid;
        };
        let request = DecisionRequest {
            food: ledger.get(ResourceKind::Food),
            water: ledger.get(ResourceKind::Water),
            energy: ledger.get(ResourceKind::Energy),
            gold: ledger.get(ResourceKind::Gold),
            nearby: map.nearby(),
            position,
        };
        let decision = source.decide_turn(&request).await;
        debug!(x = position.x, y = position.y, %decision, "Turn decision");
        decision
    }

    fn resolve<M: TileLookup>(&self, decision: Decision, ledger: &mut ResourceLedger, map: &M) -> TurnOutcome {
        let Some(tile) = map.current_tile() else {
            warn!(%decision, "No tile under player, turn is invalid");
            return TurnOutcome::Invalid;
        };

        match decision {
            Decision::Move(direction) => TurnOutcome::Moved(direction),
            Decision::Rest => {
                let energy_gained = ledger.apply_bonus(ResourceKind::Energy, self.turn.rest_energy_gain);
                let food_paid = ledger.apply_cost(ResourceKind::Food, tile.food_cost);
                let water_paid = ledger.apply_cost(ResourceKind::Water, tile.water_cost);
                info!(energy_gained, food_paid, water_paid, terrain = %tile.terrain, "Rested");
                TurnOutcome::Rested {
                    energy_gained,
                    food_paid,
                    water_paid,
                }
            }
            Decision::Trade if tile.has_trader() => TurnOutcome::TradeAvailable,
            Decision::Trade => {
                info!(terrain = %tile.terrain, "No trader here, turn wasted");
                TurnOutcome::Wasted
            }
            Decision::Invalid => TurnOutcome::Invalid,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wayfarer_types::{TradeAction, TradeDecisionRequest, TraderArchetype};

    use super::*;
    use crate::decision::{IdleDecisionSource, human_input};
    use crate::driver::SessionLifetime;

    struct OneTile {
        tile: TileSummary,
        trader: Option<Trader>,
    }

    impl OneTile {
        fn plains(trader: Option<Trader>) -> Self {
            let mut items = Vec::new();
            if trader.is_some() {
                items.push(TileSummary::TRADER_FLAG.to_owned());
            }
            Self {
                tile: TileSummary {
                    terrain: "Plains".to_owned(),
                    move_cost: 1,
                    food_cost: 1,
                    water_cost: 2,
                    items,
                },
                trader,
            }
        }
    }

    impl TileLookup for OneTile {
        fn position(&self) -> Option<MapPosition> {
            Some(MapPosition { x: 0, y: 0 })
        }

        fn current_tile(&self) -> Option<&TileSummary> {
            Some(&self.tile)
        }

        fn nearby(&self) -> Vec<Vec<Option<TileSummary>>> {
            vec![vec![Some(self.tile.clone())]]
        }

        fn trader_here(&mut self) -> Option<&mut Trader> {
            self.trader.as_mut()
        }
    }

    struct TradeOnce;

    impl TurnDecisionSource for TradeOnce {
        async fn decide_turn(&mut self, _request: &DecisionRequest) -> Decision {
            Decision::Trade
        }
    }

    impl TradeDecisionSource for TradeOnce {
        async fn decide_trade(&mut self, request: &TradeDecisionRequest) -> TradeAction {
            match request.current_offer {
                None => TradeAction::Counter(wayfarer_types::TradeOffer::new(3, 2, 0).into()),
                Some(_) => TradeAction::Accept,
            }
        }
    }

    fn wallet() -> ResourceLedger {
        GameConfig::default()
            .player
            .new_ledger()
            .with_amount(ResourceKind::Energy, 1)
            .with_amount(ResourceKind::Food, 0)
    }

    #[tokio::test]
    async fn rest_gains_energy_and_pays_tile_costs() {
        let driver = TurnDriver::new(&GameConfig::default());
        let mut ledger = wallet();
        let outcome = driver
            .play_turn(&mut ledger, &OneTile::plains(None), &mut IdleDecisionSource::new())
            .await;

        assert_eq!(
            outcome,
            TurnOutcome::Rested {
                energy_gained: 2,
                food_paid: 0,
                water_paid: 2
            }
        );
        assert_eq!(ledger.get(ResourceKind::Energy), 3);
        assert_eq!(ledger.get(ResourceKind::Food), 0);
        assert_eq!(ledger.get(ResourceKind::Water), 3);
    }

    #[tokio::test]
    async fn trade_without_trader_is_wasted() {
        let driver = TurnDriver::new(&GameConfig::default());
        let mut ledger = wallet();
        let before = ledger.clone();
        let outcome = driver
            .play_turn(&mut ledger, &OneTile::plains(None), &mut TradeOnce)
            .await;
        assert_eq!(outcome, TurnOutcome::Wasted);
        assert_eq!(ledger, before);
    }

    #[tokio::test]
    async fn human_trade_request_is_handed_back() {
        let driver = TurnDriver::new(&GameConfig::default());
        let (queue, mut source) = human_input(1);
        queue.submit(Decision::Trade).unwrap();
        let map = OneTile::plains(Some(Trader::new(TraderArchetype::Normal, 3, 3, 3)));
        let outcome = driver.play_turn(&mut wallet(), &map, &mut source).await;
        assert_eq!(outcome, TurnOutcome::TradeAvailable);
    }

    #[tokio::test]
    async fn closed_human_queue_is_invalid() {
        let driver = TurnDriver::new(&GameConfig::default());
        let (queue, mut source) = human_input(1);
        drop(queue);
        let outcome = driver
            .play_turn(&mut wallet(), &OneTile::plains(None), &mut source)
            .await;
        assert_eq!(outcome, TurnOutcome::Invalid);
    }

    #[tokio::test]
    async fn ai_turn_negotiates_with_trader_on_tile() {
        let driver = TurnDriver::new(&GameConfig::default());
        let (_lifetime, cancellation) = SessionLifetime::new();
        let mut ledger = wallet();
        let mut map = OneTile::plains(Some(Trader::new(TraderArchetype::Stingy, 5, 5, 0)));

        let outcome = driver
            .play_ai_turn(&mut ledger, &mut map, &mut TradeOnce, &cancellation)
            .await;

        let finished = match outcome {
            TurnOutcome::Traded(DriveOutcome::Finished { outcome, .. }) => Some(outcome),
            _ => None,
        };
        assert!(finished.is_some_and(|trade| trade.is_completed()));
        assert_eq!(ledger.get(ResourceKind::Food), 2);
        assert_eq!(ledger.get(ResourceKind::Gold), 7);
        assert_eq!(map.trader.as_ref().map(Trader::food_stock), Some(3));
    }
}
