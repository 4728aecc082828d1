//! Trade offers and the remote trade actions that carry them.
//!
//! A [`TradeOffer`] is the validated, unsigned form used by the engine.
//! A [`ProposedOffer`] is what arrives over the wire from the decision
//! service: signed, untrusted, and only convertible into a [`TradeOffer`]
//! by the counter-offer validation guard in `wayfarer-trade`.

use serde::{Deserialize, Serialize};

/// A proposed bidirectional resource transfer between player and trader.
///
/// Only `gold_from_player`, `food_to_player` and `water_to_player` are
/// exercised by the protocol. The remaining fields exist for symmetry and
/// are always zero in offers built by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeOffer {
    /// Gold the player pays the trader.
    pub gold_from_player: u32,
    /// Food the player receives.
    pub food_to_player: u32,
    /// Water the player receives.
    pub water_to_player: u32,
    /// Gold the player receives. Unused.
    #[serde(default)]
    pub gold_to_player: u32,
    /// Food the trader receives. Unused.
    #[serde(default)]
    pub food_to_trader: u32,
    /// Water the trader receives. Unused.
    #[serde(default)]
    pub water_to_trader: u32,
}

impl TradeOffer {
    /// Basic gold-for-goods offer.
    pub const fn new(gold_from_player: u32, food_to_player: u32, water_to_player: u32) -> Self {
        Self {
            gold_from_player,
            food_to_player,
            water_to_player,
            gold_to_player: 0,
            food_to_trader: 0,
            water_to_trader: 0,
        }
    }

    /// The zeroed offer every negotiation starts from.
    pub const fn empty() -> Self {
        Self::new(0, 0, 0)
    }

    /// Total units the player receives.
    pub fn player_value(&self) -> u64 {
        u64::from(self.gold_to_player)
            .saturating_add(u64::from(self.food_to_player))
            .saturating_add(u64::from(self.water_to_player))
    }

    /// Total units the trader receives.
    pub fn trader_value(&self) -> u64 {
        u64::from(self.gold_from_player)
            .saturating_add(u64::from(self.food_to_trader))
            .saturating_add(u64::from(self.water_to_trader))
    }

    /// Whether neither side gives anything.
    pub fn is_empty(&self) -> bool {
        self.player_value() == 0 && self.trader_value() == 0
    }

    /// Whether both sides give something, the precondition for submitting.
    pub fn is_two_sided(&self) -> bool {
        self.player_value() != 0 && self.trader_value() != 0
    }
}

impl core::fmt::Display for TradeOffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "(player receives: {} gold, {} food, {} water) (trader receives: {} gold, {} food, {} water)",
            self.gold_to_player,
            self.food_to_player,
            self.water_to_player,
            self.gold_from_player,
            self.food_to_trader,
            self.water_to_trader,
        )
    }
}

/// An offer as proposed by the remote decision service.
///
/// Signed so that adversarial payloads (`"goldFromPlayer": -1`) deserialize
/// and are rejected by validation with a precise reason rather than a
/// generic parse error. Accepts both camelCase and snake_case keys, and the
/// legacy `goldToTrader` spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedOffer {
    /// Gold the player would pay.
    #[serde(alias = "gold_from_player", alias = "goldToTrader", alias = "gold_to_trader")]
    pub gold_from_player: i64,
    /// Food the player would receive.
    #[serde(alias = "food_to_player")]
    pub food_to_player: i64,
    /// Water the player would receive.
    #[serde(alias = "water_to_player")]
    pub water_to_player: i64,
    /// Gold the player would receive. Must be zero.
    #[serde(default, alias = "gold_to_player")]
    pub gold_to_player: i64,
    /// Food the trader would receive. Must be zero.
    #[serde(default, alias = "food_to_trader")]
    pub food_to_trader: i64,
    /// Water the trader would receive. Must be zero.
    #[serde(default, alias = "water_to_trader")]
    pub water_to_trader: i64,
}

impl From<TradeOffer> for ProposedOffer {
    fn from(offer: TradeOffer) -> Self {
        Self {
            gold_from_player: i64::from(offer.gold_from_player),
            food_to_player: i64::from(offer.food_to_player),
            water_to_player: i64::from(offer.water_to_player),
            gold_to_player: i64::from(offer.gold_to_player),
            food_to_trader: i64::from(offer.food_to_trader),
            water_to_trader: i64::from(offer.water_to_trader),
        }
    }
}

/// The remote service's answer to a trade decision request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    /// Take the offer currently on the table.
    Accept,
    /// Walk away.
    Reject,
    /// Propose a different offer.
    Counter(ProposedOffer),
}

impl TradeAction {
    /// Protocol keyword for this action.
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Accept => "ACCEPT",
            Self::Reject => "REJECT",
            Self::Counter(_) => "COUNTER OFFER",
        }
    }
}
