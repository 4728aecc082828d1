//! A minimal open world for headless runs.
//!
//! Every tile is open plains except a single trading post where the trader
//! stands. The runner uses it to exercise the decision service end to end
//! without a real map.

use std::ops::RangeInclusive;

use tracing::debug;
use wayfarer_core::TileLookup;
use wayfarer_trade::{ResourceLedger, Trader};
use wayfarer_types::{Direction, MapPosition, ResourceKind, TileSummary};

/// Offsets visible from the player along each axis.
const VISION: RangeInclusive<i32> = -1..=1;

/// Open plains with one trading post.
#[derive(Debug, Clone)]
pub struct HeadlessWorld {
    position: MapPosition,
    post: MapPosition,
    plains: TileSummary,
    trading_post: TileSummary,
    trader: Option<Trader>,
}

impl HeadlessWorld {
    /// A world with `trader` at the origin and the player standing beside it.
    pub fn new(trader: Trader) -> Self {
        let plains = TileSummary {
            terrain: "Plains".to_owned(),
            move_cost: 1,
            food_cost: 1,
            water_cost: 1,
            items: Vec::new(),
        };
        let trading_post = TileSummary {
            terrain: "Trading Post".to_owned(),
            items: vec![TileSummary::TRADER_FLAG.to_owned()],
            ..plains.clone()
        };
        Self {
            position: MapPosition::default(),
            post: MapPosition::default(),
            plains,
            trading_post,
            trader: Some(trader),
        }
    }

    /// Place the player somewhere else.
    #[must_use]
    pub const fn with_position(mut self, position: MapPosition) -> Self {
        self.position = position;
        self
    }

    /// The trader, with its current stock.
    pub const fn trader(&self) -> Option<&Trader> {
        self.trader.as_ref()
    }

    /// Move the player one tile and charge the destination's costs.
    ///
    /// Returns `false` and stays put if the step would leave the grid.
    pub fn step(&mut self, direction: Direction, ledger: &mut ResourceLedger) -> bool {
        let (dx, dy) = direction.offset();
        let (Some(x), Some(y)) = (self.position.x.checked_add(dx), self.position.y.checked_add(dy)) else {
            return false;
        };
        self.position = MapPosition { x, y };

        let tile = self.tile_at(self.position);
        let energy = ledger.apply_cost(ResourceKind::Energy, tile.move_cost);
        let food = ledger.apply_cost(ResourceKind::Food, tile.food_cost);
        let water = ledger.apply_cost(ResourceKind::Water, tile.water_cost);
        debug!(x, y, energy, food, water, terrain = %tile.terrain, "Moved");
        true
    }

    fn tile_at(&self, position: MapPosition) -> &TileSummary {
        if position == self.post && self.trader.is_some() {
            &self.trading_post
        } else {
            &self.plains
        }
    }

    fn cell(&self, dx: i32, dy: i32) -> Option<TileSummary> {
        let x = self.position.x.checked_add(dx)?;
        let y = self.position.y.checked_add(dy)?;
        Some(self.tile_at(MapPosition { x, y }).clone())
    }
}

impl TileLookup for HeadlessWorld {
    fn position(&self) -> Option<MapPosition> {
        Some(self.position)
    }

    fn current_tile(&self) -> Option<&TileSummary> {
        Some(self.tile_at(self.position))
    }

    fn nearby(&self) -> Vec<Vec<Option<TileSummary>>> {
        VISION
            .map(|dy| VISION.map(|dx| self.cell(dx, dy)).collect())
            .collect()
    }

    fn trader_here(&mut self) -> Option<&mut Trader> {
        if self.position == self.post {
            self.trader.as_mut()
        } else {
            None
        }
    }
}
