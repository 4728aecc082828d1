//! Enumeration types for the Wayfarer game.
//!
//! Covers the wallet resource kinds, the three trader archetypes, map
//! difficulty, compass directions, and the turn-level [`Decision`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A resource tracked in the player's wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Food, consumed by movement and resting.
    Food,
    /// Water, consumed by movement and resting.
    Water,
    /// Energy, consumed by movement and restored by resting.
    Energy,
    /// Gold, the currency paid to traders.
    Gold,
}

impl ResourceKind {
    /// Lowercase name used in logs and payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Water => "water",
            Self::Energy => "energy",
            Self::Gold => "gold",
        }
    }
}

// ---------------------------------------------------------------------------
// Traders
// ---------------------------------------------------------------------------

/// The personality of a trader, which fixes its profit margin and how hard
/// it is to haggle with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraderArchetype {
    /// Asks for exactly the value it gives up.
    Normal,
    /// Accepts a discount: margin 0.75.
    Generous,
    /// Demands a premium: margin 1.5.
    Stingy,
}

impl TraderArchetype {
    /// All archetypes, in spawn-table order.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Generous, Self::Stingy];

    /// Lowercase name sent to the decision service as `trader_info.type`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Generous => "generous",
            Self::Stingy => "stingy",
        }
    }

    /// Default profit margin for this archetype.
    ///
    /// A trader accepts when `player_value * margin <= trader_value`.
    pub const fn profit_margin(self) -> Decimal {
        match self {
            Self::Normal => Decimal::ONE,
            Self::Generous => Decimal::from_parts(75, 0, 0, false, 2),
            Self::Stingy => Decimal::from_parts(15, 0, 0, false, 1),
        }
    }
}

impl core::fmt::Display for TraderArchetype {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map difficulty. Scales how much stock traders spawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Well-stocked traders.
    Easy,
    /// The default.
    #[default]
    Medium,
    /// Sparse, sometimes empty, traders.
    Hard,
}

// ---------------------------------------------------------------------------
// Turn decisions
// ---------------------------------------------------------------------------

/// One of the eight compass directions a player can move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Up one row.
    North,
    /// Down one row.
    South,
    /// Right one column.
    East,
    /// Left one column.
    West,
    /// Up and right.
    NorthEast,
    /// Up and left.
    NorthWest,
    /// Down and right.
    SouthEast,
    /// Down and left.
    SouthWest,
}

impl Direction {
    /// Parse a direction token, case-insensitively.
    ///
    /// Accepts the full names (`NORTHEAST`) and the short forms (`NE`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "NORTH" | "N" => Some(Self::North),
            "SOUTH" | "S" => Some(Self::South),
            "EAST" | "E" => Some(Self::East),
            "WEST" | "W" => Some(Self::West),
            "NORTHEAST" | "NE" => Some(Self::NorthEast),
            "NORTHWEST" | "NW" => Some(Self::NorthWest),
            "SOUTHEAST" | "SE" => Some(Self::SouthEast),
            "SOUTHWEST" | "SW" => Some(Self::SouthWest),
            _ => None,
        }
    }

    /// Uppercase token as it appears in `MOVE <DIR>`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::East => "EAST",
            Self::West => "WEST",
            Self::NorthEast => "NORTHEAST",
            Self::NorthWest => "NORTHWEST",
            Self::SouthEast => "SOUTHEAST",
            Self::SouthWest => "SOUTHWEST",
        }
    }

    /// Grid offset `(dx, dy)`; north is negative `y`.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::NorthEast => (1, -1),
            Self::NorthWest => (-1, -1),
            Self::SouthEast => (1, 1),
            Self::SouthWest => (-1, 1),
        }
    }
}

/// What the player does with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Move one tile in the given direction.
    Move(Direction),
    /// Stay put and recover energy.
    Rest,
    /// Trade with the trader on the current tile.
    Trade,
    /// Reserved for precondition failures (missing player or map state).
    Invalid,
}

impl core::fmt::Display for Decision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Move(direction) => write!(f, "MOVE {}", direction.as_str()),
            Self::Rest => f.write_str("REST"),
            Self::Trade => f.write_str("TRADE"),
            Self::Invalid => f.write_str("INVALID"),
        }
    }
}
