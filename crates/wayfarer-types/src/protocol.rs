//! JSON payloads exchanged with the external decision service.
//!
//! Three endpoints exist: `/decide` (turn decisions), `/trade` (trade
//! decisions) and `/reset` (clears the service's per-run memory). Field
//! names are snake_case to match the service; offers embedded in them keep
//! their own camelCase form.

use serde::{Deserialize, Serialize};

use crate::enums::TraderArchetype;
use crate::offer::TradeOffer;

/// A grid coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapPosition {
    /// Column, growing east.
    pub x: i32,
    /// Row, growing south.
    pub y: i32,
}

/// What the player can see of one tile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileSummary {
    /// Biome name (`Plains`, `Desert`, ...).
    pub terrain: String,
    /// Energy spent entering the tile.
    pub move_cost: u32,
    /// Food spent entering or resting on the tile.
    pub food_cost: u32,
    /// Water spent entering or resting on the tile.
    pub water_cost: u32,
    /// Flags such as `Food Bonus` or `Trader`.
    #[serde(default)]
    pub items: Vec<String>,
}

impl TileSummary {
    /// Item flag marking a tile with a trader on it.
    pub const TRADER_FLAG: &'static str = "Trader";

    /// Whether a trader stands on this tile.
    pub fn has_trader(&self) -> bool {
        self.items.iter().any(|item| item == Self::TRADER_FLAG)
    }
}

/// Body of `POST /decide`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Current food.
    pub food: u32,
    /// Current water.
    pub water: u32,
    /// Current energy.
    pub energy: u32,
    /// Current gold.
    pub gold: u32,
    /// Visible neighbourhood, row-major; `None` for cells outside vision.
    pub nearby: Vec<Vec<Option<TileSummary>>>,
    /// The player's position.
    pub position: MapPosition,
}

/// Body returned by `POST /decide`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionResponse {
    /// Free-text decision such as `MOVE EAST`.
    #[serde(default)]
    pub decision: String,
}

/// Wallet snapshot sent with a trade decision request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Current food.
    pub food: u32,
    /// Current water.
    pub water: u32,
    /// Current gold.
    pub gold: u32,
    /// Food capacity.
    pub max_food: u32,
    /// Water capacity.
    pub max_water: u32,
}

/// Trader snapshot sent with a trade decision request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderInfo {
    /// The trader's archetype.
    #[serde(rename = "type")]
    pub archetype: TraderArchetype,
    /// Food the trader can sell.
    pub food_stock: u32,
    /// Water the trader can sell.
    pub water_stock: u32,
}

/// Body of `POST /trade`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeDecisionRequest {
    /// The player's wallet.
    pub player_stats: PlayerStats,
    /// The trader being negotiated with.
    pub trader_info: TraderInfo,
    /// The offer on the table; `None` in the opening round.
    pub current_offer: Option<TradeOffer>,
    /// Rounds already played in this negotiation.
    #[serde(default)]
    pub round: u32,
}

/// Body returned by `POST /trade`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradeDecisionResponse {
    /// `ACCEPT`, `REJECT`, or `COUNTER OFFER {json}`.
    #[serde(default)]
    pub trade_action: String,
    /// Set by the service when it could not decide.
    #[serde(default)]
    pub error: Option<String>,
}
