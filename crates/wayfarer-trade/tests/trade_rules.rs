//! Integration tests for trader policy, counter validation and settlement.
//!
//! Exercises the public API the negotiation engine relies on: the policy
//! verdicts for the reference scenarios, the properties the policy must
//! hold for every offer, and adversarial counters from the decision service.

#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;
use wayfarer_trade::{
    CounterViolation, LedgerCapacity, PolicyVerdict, ResourceLedger, Trader, counter_offer,
    evaluate_offer, respond, validate_counter,
};
use wayfarer_types::{ProposedOffer, ResourceKind, TradeOffer, TraderArchetype};

fn wallet(food: u32, water: u32, gold: u32) -> ResourceLedger {
    ResourceLedger::new(
        LedgerCapacity {
            max_food: 10,
            max_water: 10,
            max_energy: 10,
        },
        gold,
    )
    .with_amount(ResourceKind::Food, food)
    .with_amount(ResourceKind::Water, water)
}

/// Every offer with each field in `0..=max`.
fn all_offers(max: u32) -> Vec<TradeOffer> {
    let mut offers = Vec::new();
    for gold in 0..=max {
        for food in 0..=max {
            for water in 0..=max {
                offers.push(TradeOffer::new(gold, food, water));
            }
        }
    }
    offers
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn normal_trader_counters_underpriced_food() {
    let trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let offer = TradeOffer::new(2, 3, 0);

    assert!(!evaluate_offer(&trader, &offer));
    assert_eq!(
        respond(&trader, &offer),
        PolicyVerdict::Counter(TradeOffer::new(3, 3, 0))
    );
}

#[test]
fn stingy_trader_accepts_generous_payment() {
    let trader = Trader::new(TraderArchetype::Stingy, 5, 5, 5);
    let offer = TradeOffer::new(3, 2, 0);

    assert!(evaluate_offer(&trader, &offer));
    assert_eq!(respond(&trader, &offer), PolicyVerdict::Accept);
}

#[test]
fn archetype_margins_scale_the_price() {
    let margins: Vec<_> = TraderArchetype::ALL
        .iter()
        .map(|&archetype| Trader::new(archetype, 1, 1, 1).profit_margin())
        .collect();
    assert!(margins.contains(&dec!(0.75)));
    assert!(margins.contains(&dec!(1.0)));
    assert!(margins.contains(&dec!(1.5)));
    assert_eq!(Trader::new(TraderArchetype::Stingy, 1, 1, 1).profit_margin(), dec!(1.5));
}

#[test]
fn negative_gold_counter_fails_validation() {
    let trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let proposed: ProposedOffer =
        serde_json::from_str(r#"{"goldFromPlayer": -1, "foodToPlayer": 0, "waterToPlayer": 0}"#)
            .unwrap();

    let result = validate_counter(&proposed, &wallet(2, 2, 10), &trader);
    assert!(matches!(result, Err(CounterViolation::NegativeAmount { .. })));
}

// ---------------------------------------------------------------------------
// Policy properties
// ---------------------------------------------------------------------------

#[test]
fn zero_trader_value_never_accepted() {
    for archetype in TraderArchetype::ALL {
        let trader = Trader::new(archetype, 6, 6, 6);
        for offer in all_offers(6).iter().filter(|o| o.trader_value() == 0) {
            assert!(!evaluate_offer(&trader, offer), "{archetype} accepted {offer}");
        }
    }
}

#[test]
fn over_stock_never_accepted() {
    for archetype in TraderArchetype::ALL {
        let trader = Trader::new(archetype, 2, 3, 0);
        for offer in all_offers(6)
            .iter()
            .filter(|o| o.food_to_player > 2 || o.water_to_player > 3)
        {
            assert!(!evaluate_offer(&trader, offer), "{archetype} accepted {offer}");
        }
    }
}

#[test]
fn counters_never_exceed_stock() {
    for archetype in TraderArchetype::ALL {
        let trader = Trader::new(archetype, 2, 1, 0);
        for offer in all_offers(5) {
            if let Some(counter) = counter_offer(&trader, &offer) {
                assert!(counter.food_to_player <= trader.food_stock());
                assert!(counter.water_to_player <= trader.water_stock());
            }
        }
    }
}

#[test]
fn generous_accepts_whatever_stingy_accepts() {
    let generous = Trader::new(TraderArchetype::Generous, 9, 9, 9);
    let stingy = Trader::new(TraderArchetype::Stingy, 9, 9, 9);
    for offer in all_offers(6) {
        if evaluate_offer(&stingy, &offer) {
            assert!(evaluate_offer(&generous, &offer), "generous refused {offer}");
        }
    }
}

// ---------------------------------------------------------------------------
// Adversarial counters
// ---------------------------------------------------------------------------

#[test]
fn counter_over_max_food_is_always_rejected() {
    let trader = Trader::new(TraderArchetype::Normal, 10, 10, 0);
    for food_in_wallet in 0..=10 {
        let ledger = wallet(food_in_wallet, 0, 50);
        let room = 10 - food_in_wallet;
        for extra in 1..=3 {
            let proposed = ProposedOffer {
                gold_from_player: 1,
                food_to_player: i64::from(room + extra),
                water_to_player: 0,
                ..ProposedOffer::default()
            };
            let result = validate_counter(&proposed, &ledger, &trader);
            assert!(
                matches!(
                    result,
                    Err(CounterViolation::OverCapacity { .. } | CounterViolation::OverStock { .. })
                ),
                "wallet food {food_in_wallet} accepted {proposed:?}"
            );
        }
    }
}

#[test]
fn counter_over_stock_is_rejected() {
    let trader = Trader::new(TraderArchetype::Generous, 1, 1, 0);
    let proposed: ProposedOffer =
        serde_json::from_str(r#"{"goldFromPlayer": 2, "foodToPlayer": 0, "waterToPlayer": 4}"#)
            .unwrap();
    assert!(matches!(
        validate_counter(&proposed, &wallet(0, 0, 10), &trader),
        Err(CounterViolation::OverStock {
            kind: ResourceKind::Water,
            ..
        })
    ));
}

#[test]
fn counter_with_reserved_fields_is_rejected() {
    let trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    let proposed: ProposedOffer = serde_json::from_str(
        r#"{"goldFromPlayer": 2, "foodToPlayer": 1, "waterToPlayer": 0, "goldToPlayer": 5}"#,
    )
    .unwrap();
    assert!(matches!(
        validate_counter(&proposed, &wallet(0, 0, 10), &trader),
        Err(CounterViolation::UnsupportedField { .. })
    ));
}

#[test]
fn gold_only_counter_is_rejected() {
    let trader = Trader::new(TraderArchetype::Normal, 5, 5, 5);
    for gold in 1..=10 {
        let proposed = ProposedOffer {
            gold_from_player: gold,
            ..ProposedOffer::default()
        };
        assert!(
            matches!(
                validate_counter(&proposed, &wallet(0, 0, 10), &trader),
                Err(CounterViolation::OneSided { player_value: 0, .. })
            ),
            "gold {gold} for nothing passed validation"
        );
    }
}

#[test]
fn goods_only_counter_is_rejected() {
    let trader = Trader::new(TraderArchetype::Generous, 5, 5, 5);
    let proposed: ProposedOffer =
        serde_json::from_str(r#"{"goldFromPlayer": 0, "foodToPlayer": 3, "waterToPlayer": 0}"#)
            .unwrap();
    assert_eq!(
        validate_counter(&proposed, &wallet(0, 0, 10), &trader),
        Err(CounterViolation::OneSided {
            player_value: 3,
            trader_value: 0
        })
    );
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

#[test]
fn accepted_offer_settles_both_sides() {
    let mut trader = Trader::new(TraderArchetype::Stingy, 5, 5, 5);
    let mut ledger = wallet(1, 1, 10);
    let offer = TradeOffer::new(3, 2, 0);

    assert!(evaluate_offer(&trader, &offer));
    ledger.apply_trade(&offer).unwrap();
    trader.modify_stock(&offer).unwrap();

    assert_eq!(ledger.get(ResourceKind::Gold), 7);
    assert_eq!(ledger.get(ResourceKind::Food), 3);
    assert_eq!(trader.food_stock(), 3);
    assert_eq!(trader.gold_stock(), 8);
}
