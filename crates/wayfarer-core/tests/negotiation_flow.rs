//! Integration tests for full negotiations.
//!
//! Human negotiations are driven call by call; AI negotiations run through
//! [`AiNegotiator`] against scripted and misbehaving decision sources.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wayfarer_core::{
    AiNegotiator, DriveOutcome, Effect, GameConfig, HaggleRound, MAX_ROUNDS, Negotiation,
    NegotiationError, NegotiationRules, NegotiationState, PlayerMode, RejectReason, SessionLifetime,
    TradeDecisionSource, TradeOutcome,
};
use wayfarer_trade::{
    CounterViolation, HaggleBar, HaggleResult, LedgerCapacity, ResourceLedger, Trader, haggle_discount,
};
use wayfarer_types::{
    Difficulty, ProposedOffer, ResourceKind, TradeAction, TradeDecisionRequest, TradeOffer,
    TraderArchetype,
};

// =========================================================================
// Helpers
// =========================================================================

fn wallet(gold: u32) -> ResourceLedger {
    ResourceLedger::new(
        LedgerCapacity {
            max_food: 5,
            max_water: 5,
            max_energy: 5,
        },
        gold,
    )
    .with_amount(ResourceKind::Food, 0)
    .with_amount(ResourceKind::Water, 0)
}

/// Answers from a fixed script, then rejects. Records every request.
#[derive(Default)]
struct Scripted {
    actions: VecDeque<TradeAction>,
    seen: Vec<TradeDecisionRequest>,
}

impl Scripted {
    fn new(actions: impl IntoIterator<Item = TradeAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            seen: Vec::new(),
        }
    }
}

impl TradeDecisionSource for Scripted {
    async fn decide_trade(&mut self, request: &TradeDecisionRequest) -> TradeAction {
        self.seen.push(*request);
        self.actions.pop_front().unwrap_or(TradeAction::Reject)
    }
}

/// Always counters with the same underpriced offer.
struct Lowballer;

impl TradeDecisionSource for Lowballer {
    async fn decide_trade(&mut self, _request: &TradeDecisionRequest) -> TradeAction {
        TradeAction::Counter(TradeOffer::new(1, 3, 0).into())
    }
}

/// Never answers in time.
struct Unresponsive;

impl TradeDecisionSource for Unresponsive {
    async fn decide_trade(&mut self, _request: &TradeDecisionRequest) -> TradeAction {
        tokio::time::sleep(Duration::from_secs(30)).await;
        TradeAction::Accept
    }
}

fn counter(gold: i64, food: i64, water: i64) -> TradeAction {
    TradeAction::Counter(ProposedOffer {
        gold_from_player: gold,
        food_to_player: food,
        water_to_player: water,
        ..ProposedOffer::default()
    })
}

/// The bar carried by the single `StartHaggle` effect of a submit.
fn haggle_bar(effects: &[Effect]) -> Option<HaggleBar> {
    match effects {
        [Effect::StartHaggle(bar)] => Some(bar.clone()),
        _ => None,
    }
}

fn finished(outcome: DriveOutcome) -> (TradeOutcome, Vec<Effect>) {
    match outcome {
        DriveOutcome::Finished { outcome, effects } => (outcome, effects),
        DriveOutcome::Cancelled { effects } => (
            TradeOutcome::Rejected(RejectReason::ServiceDeclined),
            effects,
        ),
    }
}

// =========================================================================
// Human flow
// =========================================================================

#[test]
fn human_rounds_are_bounded() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let (mut negotiation, _) =
        Negotiation::start(&mut ledger, &mut trader, PlayerMode::Human, NegotiationRules::default());

    for _ in 0..3 {
        negotiation.increment(ResourceKind::Food).unwrap();
    }
    negotiation.increment(ResourceKind::Gold).unwrap();

    for round in 1..=MAX_ROUNDS {
        let effects = negotiation.submit().unwrap();
        assert_eq!(effects, vec![Effect::ShowCounter(TradeOffer::new(3, 3, 0))]);
        assert_eq!(negotiation.round_count(), round);

        negotiation.revise_counter().unwrap();
        negotiation.decrement(ResourceKind::Gold).unwrap();
        negotiation.decrement(ResourceKind::Gold).unwrap();
    }

    negotiation.submit().unwrap();
    assert_eq!(negotiation.state(), NegotiationState::Rejected);
    assert_eq!(
        negotiation.outcome(),
        Some(&TradeOutcome::Rejected(RejectReason::RoundLimit))
    );
}

#[test]
fn identical_counter_ends_in_rejection() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Stingy, 5, 5, 5);
    {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Human, NegotiationRules::default());
        for _ in 0..2 {
            negotiation.increment(ResourceKind::Food).unwrap();
            negotiation.increment(ResourceKind::Gold).unwrap();
        }

        // Stingy wants 3 for 2 food but counters at floor(2 + 0) = 2, the same offer.
        negotiation.submit().unwrap();
        assert_eq!(
            negotiation.outcome(),
            Some(&TradeOutcome::Rejected(RejectReason::NoCounter))
        );
    }
    assert_eq!(ledger.get(ResourceKind::Gold), 10);
    assert_eq!(trader.food_stock(), 5);
}

#[test]
fn stingy_trader_accepts_fair_price_after_haggle() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Stingy, 5, 5, 5);
    {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Human, NegotiationRules::default());
        for _ in 0..2 {
            negotiation.increment(ResourceKind::Food).unwrap();
        }
        for _ in 0..3 {
            negotiation.increment(ResourceKind::Gold).unwrap();
        }

        let effects = negotiation.submit().unwrap();
        assert!(matches!(effects.as_slice(), [Effect::StartHaggle(_)]));
        negotiation.finish_haggle(HaggleResult::Perfect).unwrap();
        assert_eq!(negotiation.state(), NegotiationState::Completed);
    }
    // Stingy perfect haggle knocks 1 off.
    assert_eq!(ledger.get(ResourceKind::Gold), 8);
    assert_eq!(ledger.get(ResourceKind::Food), 2);
    assert_eq!(trader.gold_stock(), 7);
}

#[test]
fn resubmitting_unaffordable_counter_is_refused() {
    let mut ledger = wallet(4);
    let mut trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let before = (ledger.clone(), trader.clone());
    {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Human, NegotiationRules::default());
        for _ in 0..5 {
            negotiation.increment(ResourceKind::Food).unwrap();
        }
        negotiation.increment(ResourceKind::Gold).unwrap();

        let effects = negotiation.submit().unwrap();
        assert_eq!(effects, vec![Effect::ShowCounter(TradeOffer::new(5, 5, 0))]);
        let refused = NegotiationError::Unaffordable(CounterViolation::Unaffordable {
            asked: 5,
            available: 4,
        });
        assert_eq!(negotiation.accept_counter(), Err(refused.clone()));

        // Sending the same counter back as the player's own offer is refused too.
        negotiation.revise_counter().unwrap();
        assert_eq!(negotiation.submit(), Err(refused));
        assert_eq!(negotiation.state(), NegotiationState::OfferMade);
        assert_eq!(negotiation.round_count(), 1);
        assert!(negotiation.finish_haggle(HaggleResult::Perfect).is_err());
    }
    assert_eq!((ledger, trader), before);
}

// =========================================================================
// Haggle
// =========================================================================

#[tokio::test]
async fn stopped_haggle_settles_with_its_discount() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Stingy, 5, 5, 5);
    let (_lifetime, cancellation) = SessionLifetime::new();

    let result = {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Human, NegotiationRules::default());
        for _ in 0..2 {
            negotiation.increment(ResourceKind::Food).unwrap();
        }
        for _ in 0..3 {
            negotiation.increment(ResourceKind::Gold).unwrap();
        }

        let bar = haggle_bar(&negotiation.submit().unwrap()).unwrap();
        let (round, stop) = HaggleRound::start(bar);
        stop.stop();
        let result = round.finish(&cancellation).await.unwrap();

        let effects = negotiation.finish_haggle(result).unwrap();
        assert!(effects.iter().any(|e| matches!(e, Effect::ShowResult(TradeOutcome::Completed(_)))));
        assert_eq!(negotiation.state(), NegotiationState::Completed);
        result
    };

    let paid = 3_u32.saturating_sub(haggle_discount(TraderArchetype::Stingy, result, 3));
    assert_eq!(ledger.get(ResourceKind::Gold), 10_u32.saturating_sub(paid));
    assert_eq!(ledger.get(ResourceKind::Food), 2);
    assert_eq!(trader.gold_stock(), 5_u32.saturating_add(paid));
    assert_eq!(trader.food_stock(), 3);
}

#[tokio::test]
async fn torn_down_haggle_leaves_wallet_and_trader_untouched() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Generous, 5, 5, 5);
    let before = (ledger.clone(), trader.clone());
    let (lifetime, cancellation) = SessionLifetime::new();

    {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Human, NegotiationRules::default());
        for _ in 0..4 {
            negotiation.increment(ResourceKind::Food).unwrap();
        }
        for _ in 0..3 {
            negotiation.increment(ResourceKind::Gold).unwrap();
        }

        let bar = haggle_bar(&negotiation.submit().unwrap()).unwrap();
        let (round, _stop) = HaggleRound::start(bar);
        lifetime.end();

        assert_eq!(round.finish(&cancellation).await, None);
        assert_eq!(negotiation.state(), NegotiationState::Haggling);
        assert!(negotiation.outcome().is_none());
    }

    assert_eq!((ledger, trader), before);
}

// =========================================================================
// AI flow
// =========================================================================

#[tokio::test]
async fn ai_counter_then_accept_settles_with_auto_close() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let mut source = Scripted::new([counter(2, 3, 0), TradeAction::Accept]);
    let (_lifetime, cancellation) = SessionLifetime::new();

    let drive = {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Ai, NegotiationRules::default());
        let mut negotiator = AiNegotiator::new(&mut source, Duration::from_secs(5));
        negotiator.drive(&mut negotiation, &cancellation).await
    };
    let (outcome, effects) = finished(drive);

    assert!(outcome.is_completed());
    assert!(effects.contains(&Effect::ShowCounter(TradeOffer::new(3, 3, 0))));
    assert!(matches!(effects.last(), Some(Effect::ScheduleAutoClose(_))));
    assert_eq!(ledger.get(ResourceKind::Gold), 7);
    assert_eq!(ledger.get(ResourceKind::Food), 3);
    assert_eq!(trader.food_stock(), 2);

    assert_eq!(source.seen.len(), 2);
    assert_eq!(source.seen.first().and_then(|r| r.current_offer), None);
    assert_eq!(
        source.seen.get(1).and_then(|r| r.current_offer),
        Some(TradeOffer::new(3, 3, 0))
    );
}

#[tokio::test]
async fn ai_rounds_are_bounded() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let (_lifetime, cancellation) = SessionLifetime::new();

    let drive = {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Ai, NegotiationRules::default());
        let mut source = Lowballer;
        let mut negotiator = AiNegotiator::new(&mut source, Duration::from_secs(5));
        let drive = negotiator.drive(&mut negotiation, &cancellation).await;
        assert_eq!(negotiation.round_count(), MAX_ROUNDS + 1);
        drive
    };

    let (outcome, _) = finished(drive);
    assert_eq!(outcome, TradeOutcome::Rejected(RejectReason::RoundLimit));
    assert_eq!(ledger.get(ResourceKind::Gold), 10);
}

#[tokio::test]
async fn trade_decision_timeout_rejects_without_mutation() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Generous, 5, 5, 5);
    let before = (ledger.clone(), trader.clone());
    let (_lifetime, cancellation) = SessionLifetime::new();

    let drive = {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Ai, NegotiationRules::default());
        let mut source = Unresponsive;
        let mut negotiator = AiNegotiator::new(&mut source, Duration::from_millis(50));
        negotiator.drive(&mut negotiation, &cancellation).await
    };

    let (outcome, effects) = finished(drive);
    assert_eq!(outcome, TradeOutcome::Rejected(RejectReason::ServiceDeclined));
    assert!(!effects.iter().any(|e| matches!(e, Effect::ScheduleAutoClose(_))));
    assert_eq!((ledger, trader), before);
}

#[tokio::test]
async fn negative_ai_counter_is_rejected() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let mut source = Scripted::new([counter(-1, 0, 0)]);
    let (_lifetime, cancellation) = SessionLifetime::new();

    let drive = {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Ai, NegotiationRules::default());
        let mut negotiator = AiNegotiator::new(&mut source, Duration::from_secs(5));
        negotiator.drive(&mut negotiation, &cancellation).await
    };

    let (outcome, _) = finished(drive);
    assert_eq!(
        outcome,
        TradeOutcome::Rejected(RejectReason::InvalidCounter(
            CounterViolation::NegativeAmount {
                field: "goldFromPlayer",
                value: -1
            }
        ))
    );
    assert_eq!(ledger.get(ResourceKind::Gold), 10);
}

#[tokio::test]
async fn gold_only_ai_counter_is_rejected() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let before = (ledger.clone(), trader.clone());
    let mut source = Scripted::new([counter(7, 0, 0)]);
    let (_lifetime, cancellation) = SessionLifetime::new();

    let drive = {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Ai, NegotiationRules::default());
        let mut negotiator = AiNegotiator::new(&mut source, Duration::from_secs(5));
        negotiator.drive(&mut negotiation, &cancellation).await
    };

    let (outcome, _) = finished(drive);
    assert_eq!(
        outcome,
        TradeOutcome::Rejected(RejectReason::InvalidCounter(CounterViolation::OneSided {
            player_value: 0,
            trader_value: 7
        }))
    );
    assert_eq!((ledger, trader), before);
}

#[tokio::test]
async fn ai_counter_over_capacity_is_rejected() {
    let mut ledger = wallet(10).with_amount(ResourceKind::Food, 4);
    let mut trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let mut source = Scripted::new([counter(2, 2, 0)]);
    let (_lifetime, cancellation) = SessionLifetime::new();

    let drive = {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Ai, NegotiationRules::default());
        let mut negotiator = AiNegotiator::new(&mut source, Duration::from_secs(5));
        negotiator.drive(&mut negotiation, &cancellation).await
    };

    let (outcome, _) = finished(drive);
    assert!(matches!(
        outcome,
        TradeOutcome::Rejected(RejectReason::InvalidCounter(CounterViolation::OverCapacity { .. }))
    ));
    assert_eq!(ledger.get(ResourceKind::Food), 4);
}

#[tokio::test]
async fn ai_accepting_unaffordable_counter_is_rejected() {
    let mut ledger = wallet(3);
    let mut trader = Trader::new(TraderArchetype::Stingy, 5, 5, 5);
    // Stingy counters 3 water at floor(3 * 1.5) = 4 gold.
    let mut source = Scripted::new([counter(1, 0, 3), TradeAction::Accept]);
    let (_lifetime, cancellation) = SessionLifetime::new();

    let drive = {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Ai, NegotiationRules::default());
        let mut negotiator = AiNegotiator::new(&mut source, Duration::from_secs(5));
        negotiator.drive(&mut negotiation, &cancellation).await
    };

    let (outcome, _) = finished(drive);
    assert!(matches!(
        outcome,
        TradeOutcome::Rejected(RejectReason::Unaffordable(CounterViolation::Unaffordable {
            asked: 4,
            available: 3
        }))
    ));
    assert_eq!(ledger.get(ResourceKind::Water), 0);
}

#[tokio::test]
async fn torn_down_session_discards_pending_decision() {
    let mut ledger = wallet(10);
    let mut trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let before = (ledger.clone(), trader.clone());
    let (lifetime, cancellation) = SessionLifetime::new();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        lifetime.end();
    });

    let state = {
        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Ai, NegotiationRules::default());
        let mut source = Unresponsive;
        let mut negotiator = AiNegotiator::new(&mut source, Duration::from_secs(10));
        let drive = negotiator.drive(&mut negotiation, &cancellation).await;
        assert!(matches!(drive, DriveOutcome::Cancelled { .. }));
        assert!(negotiation.outcome().is_none());
        negotiation.state()
    };

    assert!(!state.is_terminal());
    assert_eq!((ledger, trader), before);
}

#[tokio::test]
async fn spawned_traders_negotiate_to_a_terminal_state() {
    let config = GameConfig::default();
    let mut rng = StdRng::seed_from_u64(9);
    let (_lifetime, cancellation) = SessionLifetime::new();

    for _ in 0..20 {
        let mut ledger = config.player.new_ledger().with_amount(ResourceKind::Food, 0);
        let mut trader = Trader::spawn(&mut rng, Difficulty::Easy, &config.traders);
        let mut source = Scripted::new([counter(2, 1, 0), TradeAction::Accept]);

        let (mut negotiation, _) =
            Negotiation::start(&mut ledger, &mut trader, PlayerMode::Ai, NegotiationRules::from_config(&config));
        let mut negotiator = AiNegotiator::new(&mut source, Duration::from_secs(5));
        let (outcome, _) = finished(negotiator.drive(&mut negotiation, &cancellation).await);
        assert!(negotiation.state().is_terminal(), "{outcome:?}");
    }
}
