//! The player's wallet.
//!
//! Food, water and energy are bounded by per-resource capacities; gold only
//! has a floor of zero. Turn costs and bonuses saturate at the bounds, while
//! trades are all-or-nothing: [`ResourceLedger::apply_trade`] validates the
//! whole offer before touching any balance.

use wayfarer_types::{PlayerStats, ResourceKind, TradeOffer};

use crate::error::LedgerError;

/// Capacity limits for the bounded resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerCapacity {
    /// Maximum food.
    pub max_food: u32,
    /// Maximum water.
    pub max_water: u32,
    /// Maximum energy.
    pub max_energy: u32,
}

/// The player's mutable wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLedger {
    food: u32,
    water: u32,
    energy: u32,
    gold: u32,
    capacity: LedgerCapacity,
}

impl ResourceLedger {
    /// Create a wallet filled to capacity with `gold` starting gold.
    pub const fn new(capacity: LedgerCapacity, gold: u32) -> Self {
        Self {
            food: capacity.max_food,
            water: capacity.max_water,
            energy: capacity.max_energy,
            gold,
            capacity,
        }
    }

    /// Return a copy with `kind` set to `amount`, clamped to capacity.
    #[must_use]
    pub fn with_amount(mut self, kind: ResourceKind, amount: u32) -> Self {
        let clamped = self.max(kind).map_or(amount, |max| amount.min(max));
        *self.slot_mut(kind) = clamped;
        self
    }

    /// Current amount of a resource.
    pub const fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Food => self.food,
            ResourceKind::Water => self.water,
            ResourceKind::Energy => self.energy,
            ResourceKind::Gold => self.gold,
        }
    }

    /// Capacity of a resource; `None` for gold, which is unbounded.
    pub const fn max(&self, kind: ResourceKind) -> Option<u32> {
        match kind {
            ResourceKind::Food => Some(self.capacity.max_food),
            ResourceKind::Water => Some(self.capacity.max_water),
            ResourceKind::Energy => Some(self.capacity.max_energy),
            ResourceKind::Gold => None,
        }
    }

    /// How much more of a resource fits before hitting capacity.
    pub fn headroom(&self, kind: ResourceKind) -> u32 {
        self.max(kind)
            .map_or(u32::MAX, |max| max.saturating_sub(self.get(kind)))
    }

    /// The wallet's capacities.
    pub const fn capacity(&self) -> LedgerCapacity {
        self.capacity
    }

    /// Snapshot sent to the decision service with trade requests.
    pub const fn stats(&self) -> PlayerStats {
        PlayerStats {
            food: self.food,
            water: self.water,
            gold: self.gold,
            max_food: self.capacity.max_food,
            max_water: self.capacity.max_water,
        }
    }

    /// Deduct up to `amount`, flooring at zero. Returns what was actually paid.
    pub fn apply_cost(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let slot = self.slot_mut(kind);
        let paid = amount.min(*slot);
        *slot = slot.saturating_sub(amount);
        paid
    }

    /// Add up to `amount`, capping at capacity. Returns what was actually gained.
    pub fn apply_bonus(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let gained = amount.min(self.headroom(kind));
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(gained);
        gained
    }

    /// Check that an offer could be settled against this wallet.
    ///
    /// The player must afford the gold and have room for every good.
    /// Non-zero reserved fields are refused.
    pub fn check_trade(&self, offer: &TradeOffer) -> Result<(), LedgerError> {
        reject_reserved("goldToPlayer", offer.gold_to_player)?;
        reject_reserved("foodToTrader", offer.food_to_trader)?;
        reject_reserved("waterToTrader", offer.water_to_trader)?;

        if offer.gold_from_player > self.gold {
            return Err(LedgerError::InsufficientGold {
                needed: offer.gold_from_player,
                available: self.gold,
            });
        }
        self.check_room(ResourceKind::Food, offer.food_to_player)?;
        self.check_room(ResourceKind::Water, offer.water_to_player)?;
        Ok(())
    }

    /// Settle the player's side of a trade: pay gold, receive goods.
    ///
    /// Validates the full offer first; on error the wallet is unchanged.
    pub fn apply_trade(&mut self, offer: &TradeOffer) -> Result<(), LedgerError> {
        self.check_trade(offer)?;

        let gold = self.gold.checked_sub(offer.gold_from_player).ok_or(
            LedgerError::ArithmeticOverflow {
                context: "gold underflow in apply_trade",
            },
        )?;
        let food = self.food.checked_add(offer.food_to_player).ok_or(
            LedgerError::ArithmeticOverflow {
                context: "food overflow in apply_trade",
            },
        )?;
        let water = self.water.checked_add(offer.water_to_player).ok_or(
            LedgerError::ArithmeticOverflow {
                context: "water overflow in apply_trade",
            },
        )?;

        self.gold = gold;
        self.food = food;
        self.water = water;
        Ok(())
    }

    fn check_room(&self, kind: ResourceKind, adding: u32) -> Result<(), LedgerError> {
        if adding > self.headroom(kind) {
            return Err(LedgerError::OverCapacity {
                kind,
                current: self.get(kind),
                adding,
                capacity: self.max(kind).unwrap_or(u32::MAX),
            });
        }
        Ok(())
    }

    const fn slot_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Food => &mut self.food,
            ResourceKind::Water => &mut self.water,
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Gold => &mut self.gold,
        }
    }
}

const fn reject_reserved(field: &'static str, value: u32) -> Result<(), LedgerError> {
    if value != 0 {
        return Err(LedgerError::UnsupportedField { field, value });
    }
    Ok(())
}
