//! Trader acceptance and counter-offer rules.
//!
//! One parameterized policy covers every archetype: the archetype only
//! contributes its profit margin. Evaluation fails closed, so an offer the
//! trader cannot value or cannot supply is never accepted.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;
use wayfarer_types::TradeOffer;

use crate::trader::Trader;

/// The trader's response to a submitted offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyVerdict {
    /// The offer is acceptable as-is.
    Accept,
    /// The offer is rejected and the trader proposes this instead.
    Counter(TradeOffer),
    /// The offer is rejected and the trader has nothing better to propose.
    NoCounter,
}

/// Whether the trader accepts `offer`.
///
/// Rejects when the trader receives nothing, when any requested good
/// exceeds stock, and otherwise accepts iff
/// `player_value * margin <= trader_value`.
pub fn evaluate_offer(trader: &Trader, offer: &TradeOffer) -> bool {
    let trader_value = offer.trader_value();
    if trader_value == 0 {
        return false;
    }
    if !trader.can_supply(offer) {
        return false;
    }

    let asked = Decimal::from(offer.player_value()).checked_mul(trader.profit_margin());
    asked.is_some_and(|asked| asked <= Decimal::from(trader_value))
}

/// The trader's counter to a rejected offer.
///
/// Requested food and water are clamped to stock and the gold price is
/// recomputed as `floor(food + water * margin)`. Returns `None` when the
/// recomputed offer is identical to `offer`.
pub fn counter_offer(trader: &Trader, offer: &TradeOffer) -> Option<TradeOffer> {
    let food = offer.food_to_player.min(trader.food_stock());
    let water = offer.water_to_player.min(trader.water_stock());

    let gold = Decimal::from(water)
        .checked_mul(trader.profit_margin())
        .and_then(|water_price| water_price.checked_add(Decimal::from(food)))
        .and_then(|price| price.floor().to_u32())?;

    let counter = TradeOffer::new(gold, food, water);
    if counter == *offer {
        return None;
    }
    Some(counter)
}

/// Evaluate `offer` and, on rejection, produce the trader's counter.
pub fn respond(trader: &Trader, offer: &TradeOffer) -> PolicyVerdict {
    if evaluate_offer(trader, offer) {
        debug!(archetype = %trader.archetype(), %offer, "Trader accepts offer");
        return PolicyVerdict::Accept;
    }
    match counter_offer(trader, offer) {
        Some(counter) => {
            debug!(archetype = %trader.archetype(), %counter, "Trader counters");
            PolicyVerdict::Counter(counter)
        }
        None => {
            debug!(archetype = %trader.archetype(), %offer, "Trader has no counter");
            PolicyVerdict::NoCounter
        }
    }
}
