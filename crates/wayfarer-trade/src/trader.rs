//! NPC traders: archetype, stock, and spawning.
//!
//! A [`Trader`] owns the goods it sells and the gold it has collected. Stock
//! only ever changes through [`Trader::modify_stock`] when a trade settles.

use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use tracing::debug;
use wayfarer_types::{Difficulty, ResourceKind, TradeOffer, TraderArchetype, TraderId, TraderInfo};

use crate::config::{SpawnConfig, StockRange};
use crate::error::TradeError;

/// A trader standing on a map tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trader {
    id: TraderId,
    archetype: TraderArchetype,
    food_stock: u32,
    water_stock: u32,
    gold_stock: u32,
    profit_margin: Decimal,
}

impl Trader {
    /// Create a trader with explicit stock. The margin follows the archetype.
    pub fn new(archetype: TraderArchetype, food_stock: u32, water_stock: u32, gold_stock: u32) -> Self {
        Self {
            id: TraderId::new(),
            archetype,
            food_stock,
            water_stock,
            gold_stock,
            profit_margin: archetype.profit_margin(),
        }
    }

    /// Spawn a trader with a uniformly drawn archetype and stock drawn from
    /// the difficulty's range.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty, config: &SpawnConfig) -> Self {
        let archetype = TraderArchetype::ALL
            .choose(rng)
            .copied()
            .unwrap_or(TraderArchetype::Normal);
        let range = config.range_for(difficulty);

        let trader = Self::new(
            archetype,
            draw_stock(rng, range),
            draw_stock(rng, range),
            draw_stock(rng, range),
        );
        debug!(
            trader_id = %trader.id,
            archetype = %archetype,
            food = trader.food_stock,
            water = trader.water_stock,
            gold = trader.gold_stock,
            "Spawned trader"
        );
        trader
    }

    /// Stable identifier for log correlation.
    pub const fn id(&self) -> TraderId {
        self.id
    }

    /// The trader's archetype.
    pub const fn archetype(&self) -> TraderArchetype {
        self.archetype
    }

    /// Profit margin applied when evaluating offers.
    pub const fn profit_margin(&self) -> Decimal {
        self.profit_margin
    }

    /// Food for sale.
    pub const fn food_stock(&self) -> u32 {
        self.food_stock
    }

    /// Water for sale.
    pub const fn water_stock(&self) -> u32 {
        self.water_stock
    }

    /// Gold collected.
    pub const fn gold_stock(&self) -> u32 {
        self.gold_stock
    }

    /// Snapshot sent to the decision service.
    pub const fn info(&self) -> TraderInfo {
        TraderInfo {
            archetype: self.archetype,
            food_stock: self.food_stock,
            water_stock: self.water_stock,
        }
    }

    /// Whether the trader holds everything the offer asks of it.
    ///
    /// The trader's gold stock caps `gold_to_player`, which is always zero
    /// in validated offers.
    pub const fn can_supply(&self, offer: &TradeOffer) -> bool {
        offer.food_to_player <= self.food_stock
            && offer.water_to_player <= self.water_stock
            && offer.gold_to_player <= self.gold_stock
    }

    /// Settle the trader's side of a trade: hand over goods, collect gold.
    ///
    /// Validates the full offer first; on error the stock is unchanged.
    pub fn modify_stock(&mut self, offer: &TradeOffer) -> Result<(), TradeError> {
        let food = self.food_stock.checked_sub(offer.food_to_player).ok_or(
            TradeError::InsufficientStock {
                kind: ResourceKind::Food,
                requested: offer.food_to_player,
                stock: self.food_stock,
            },
        )?;
        let water = self.water_stock.checked_sub(offer.water_to_player).ok_or(
            TradeError::InsufficientStock {
                kind: ResourceKind::Water,
                requested: offer.water_to_player,
                stock: self.water_stock,
            },
        )?;
        let gold = self
            .gold_stock
            .checked_add(offer.gold_from_player)
            .ok_or(TradeError::ArithmeticOverflow {
                context: "gold overflow in modify_stock",
            })?;

        self.food_stock = food;
        self.water_stock = water;
        self.gold_stock = gold;
        Ok(())
    }
}

fn draw_stock<R: Rng + ?Sized>(rng: &mut R, range: StockRange) -> u32 {
    let low = range.min.min(range.max);
    let high = range.max.max(range.min);
    rng.random_range(low..=high)
}
