//! Tunables for the haggle minigame and trader spawning.
//!
//! Both structs deserialize from the `haggle` and `traders` sections of
//! `wayfarer-config.yaml`; every field falls back to the default below when
//! omitted.

use serde::Deserialize;
use wayfarer_types::{Difficulty, TraderArchetype};

/// Configuration for the haggle bar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HaggleConfig {
    /// Width of the bar in abstract units.
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,

    /// Seconds for the handle to cross the bar once at multiplier 1.0.
    #[serde(default = "default_base_cross_time_secs")]
    pub base_cross_time_secs: f64,

    /// Fraction of the bar, centered, that scores `good`.
    #[serde(default = "default_good_fraction")]
    pub good_fraction: f64,

    /// Fraction of the bar, centered, that scores `perfect`.
    #[serde(default = "default_perfect_fraction")]
    pub perfect_fraction: f64,

    /// Absolute slack applied to both band edges.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Speed multiplier for stingy traders (fastest).
    #[serde(default = "default_stingy_speed")]
    pub stingy_speed: f64,

    /// Speed multiplier for normal traders.
    #[serde(default = "default_normal_speed")]
    pub normal_speed: f64,

    /// Speed multiplier for generous traders (slowest).
    #[serde(default = "default_generous_speed")]
    pub generous_speed: f64,
}

impl HaggleConfig {
    /// Speed multiplier for the given archetype.
    pub const fn speed_multiplier(&self, archetype: TraderArchetype) -> f64 {
        match archetype {
            TraderArchetype::Stingy => self.stingy_speed,
            TraderArchetype::Normal => self.normal_speed,
            TraderArchetype::Generous => self.generous_speed,
        }
    }
}

impl Default for HaggleConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            base_cross_time_secs: default_base_cross_time_secs(),
            good_fraction: default_good_fraction(),
            perfect_fraction: default_perfect_fraction(),
            tolerance: default_tolerance(),
            stingy_speed: default_stingy_speed(),
            normal_speed: default_normal_speed(),
            generous_speed: default_generous_speed(),
        }
    }
}

/// Inclusive range a single trader stock is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StockRange {
    /// Smallest stock.
    pub min: u32,
    /// Largest stock.
    pub max: u32,
}

/// Stock ranges per map difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SpawnConfig {
    /// Difficulty the map was generated at.
    #[serde(default)]
    pub difficulty: Difficulty,

    /// Stock range on easy maps.
    #[serde(default = "default_easy_stock")]
    pub easy: StockRange,

    /// Stock range on medium maps.
    #[serde(default = "default_medium_stock")]
    pub medium: StockRange,

    /// Stock range on hard maps.
    #[serde(default = "default_hard_stock")]
    pub hard: StockRange,
}

impl SpawnConfig {
    /// Stock range for a difficulty.
    pub const fn range_for(&self, difficulty: Difficulty) -> StockRange {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            easy: default_easy_stock(),
            medium: default_medium_stock(),
            hard: default_hard_stock(),
        }
    }
}

const fn default_bar_width() -> f64 {
    1.0
}

const fn default_base_cross_time_secs() -> f64 {
    1.5
}

const fn default_good_fraction() -> f64 {
    0.3
}

const fn default_perfect_fraction() -> f64 {
    0.05
}

const fn default_tolerance() -> f64 {
    0.001
}

const fn default_stingy_speed() -> f64 {
    1.5
}

const fn default_normal_speed() -> f64 {
    1.1
}

const fn default_generous_speed() -> f64 {
    0.8
}

const fn default_easy_stock() -> StockRange {
    StockRange { min: 4, max: 10 }
}

const fn default_medium_stock() -> StockRange {
    StockRange { min: 2, max: 7 }
}

const fn default_hard_stock() -> StockRange {
    StockRange { min: 0, max: 4 }
}
