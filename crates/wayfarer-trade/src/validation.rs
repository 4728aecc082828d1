//! Guard for untrusted offers proposed by the decision service.
//!
//! A [`ProposedOffer`] only becomes a [`TradeOffer`] by passing every check
//! in [`validate_counter`]. Any violation aborts the negotiation; nothing is
//! clamped or repaired.

use wayfarer_types::{ProposedOffer, ResourceKind, TradeOffer};

use crate::ledger::ResourceLedger;
use crate::trader::Trader;

/// Why a proposed offer was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CounterViolation {
    /// A field is below zero.
    #[error("{field} is negative ({value})")]
    NegativeAmount {
        /// Wire name of the field.
        field: &'static str,
        /// The offending value.
        value: i64,
    },

    /// A field does not fit a resource amount.
    #[error("{field} is out of range ({value})")]
    OutOfRange {
        /// Wire name of the field.
        field: &'static str,
        /// The offending value.
        value: i64,
    },

    /// A reserved field is non-zero.
    #[error("{field} must be zero, got {value}")]
    UnsupportedField {
        /// Wire name of the field.
        field: &'static str,
        /// The offending value.
        value: i64,
    },

    /// Neither side gives anything.
    #[error("offer is empty")]
    Empty,

    /// Only one side gives anything.
    #[error("offer is one-sided: player gets {player_value}, trader gets {trader_value}")]
    OneSided {
        /// Goods the player would receive.
        player_value: u64,
        /// Gold the trader would receive.
        trader_value: u64,
    },

    /// The player cannot pay the asked gold.
    #[error("asks {asked} gold but the player holds {available}")]
    Unaffordable {
        /// Gold the offer asks for.
        asked: u32,
        /// Gold in the wallet.
        available: u32,
    },

    /// Receiving the goods would push the wallet past capacity.
    #[error("{kind:?} would exceed capacity: {current} + {adding} > {capacity}")]
    OverCapacity {
        /// The resource that would overflow.
        kind: ResourceKind,
        /// Current amount.
        current: u32,
        /// Amount the offer adds.
        adding: u32,
        /// Wallet capacity.
        capacity: u32,
    },

    /// The trader does not hold the requested goods.
    #[error("{kind:?} exceeds trader stock: requested {requested}, stock {stock}")]
    OverStock {
        /// The good that is short.
        kind: ResourceKind,
        /// Amount requested.
        requested: u32,
        /// Trader stock.
        stock: u32,
    },
}

/// Validate an AI-proposed counter against the wallet and the trader.
///
/// Checks, in order: reserved fields are zero, amounts are non-negative and
/// in range, both sides give something, the player can afford the gold and has
/// room for the goods, and the trader holds the goods.
pub fn validate_counter(
    proposed: &ProposedOffer,
    ledger: &ResourceLedger,
    trader: &Trader,
) -> Result<TradeOffer, CounterViolation> {
    require_zero("goldToPlayer", proposed.gold_to_player)?;
    require_zero("foodToTrader", proposed.food_to_trader)?;
    require_zero("waterToTrader", proposed.water_to_trader)?;

    let offer = TradeOffer::new(
        to_amount("goldFromPlayer", proposed.gold_from_player)?,
        to_amount("foodToPlayer", proposed.food_to_player)?,
        to_amount("waterToPlayer", proposed.water_to_player)?,
    );
    if offer.is_empty() {
        return Err(CounterViolation::Empty);
    }
    if !offer.is_two_sided() {
        return Err(CounterViolation::OneSided {
            player_value: offer.player_value(),
            trader_value: offer.trader_value(),
        });
    }

    validate_acceptance(&offer, ledger, trader)?;
    Ok(offer)
}

/// Re-check an offer already on the table before it is settled.
///
/// Wallet and stock may have moved since the offer was made, so an accept
/// is only honored while the player can still afford it.
pub fn validate_acceptance(
    offer: &TradeOffer,
    ledger: &ResourceLedger,
    trader: &Trader,
) -> Result<(), CounterViolation> {
    let gold = ledger.get(ResourceKind::Gold);
    if offer.gold_from_player > gold {
        return Err(CounterViolation::Unaffordable {
            asked: offer.gold_from_player,
            available: gold,
        });
    }

    check_capacity(ledger, ResourceKind::Food, offer.food_to_player)?;
    check_capacity(ledger, ResourceKind::Water, offer.water_to_player)?;

    check_stock(ResourceKind::Food, offer.food_to_player, trader.food_stock())?;
    check_stock(ResourceKind::Water, offer.water_to_player, trader.water_stock())?;
    Ok(())
}

const fn require_zero(field: &'static str, value: i64) -> Result<(), CounterViolation> {
    if value != 0 {
        return Err(CounterViolation::UnsupportedField { field, value });
    }
    Ok(())
}

fn to_amount(field: &'static str, value: i64) -> Result<u32, CounterViolation> {
    if value < 0 {
        return Err(CounterViolation::NegativeAmount { field, value });
    }
    u32::try_from(value).map_err(|_conversion| CounterViolation::OutOfRange { field, value })
}

fn check_capacity(ledger: &ResourceLedger, kind: ResourceKind, adding: u32) -> Result<(), CounterViolation> {
    if adding > ledger.headroom(kind) {
        return Err(CounterViolation::OverCapacity {
            kind,
            current: ledger.get(kind),
            adding,
            capacity: ledger.max(kind).unwrap_or(u32::MAX),
        });
    }
    Ok(())
}

const fn check_stock(kind: ResourceKind, requested: u32, stock: u32) -> Result<(), CounterViolation> {
    if requested > stock {
        return Err(CounterViolation::OverStock {
            kind,
            requested,
            stock,
        });
    }
    Ok(())
}
