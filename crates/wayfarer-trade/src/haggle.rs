//! The haggle minigame.
//!
//! A handle sweeps back and forth across a bar; the player stops it and the
//! stop position is scored against two nested bands centered on the bar.
//! The resulting tier buys a gold discount whose size depends on how
//! generous the trader is. Only human negotiations haggle.

use wayfarer_types::TraderArchetype;

use crate::config::HaggleConfig;

/// Scored outcome of a haggle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HaggleResult {
    /// Stopped inside the narrow center band.
    Perfect,
    /// Stopped inside the wide center band.
    Good,
    /// Stopped outside both bands.
    Fail,
}

impl HaggleResult {
    /// Lowercase name used in logs and result messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Good => "good",
            Self::Fail => "fail",
        }
    }
}

impl core::fmt::Display for HaggleResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gold discount earned by a haggle result.
///
/// Stingy traders give 1/0, normal 2/1, generous 3/2 for perfect/good.
/// The discount never brings the price below one gold.
pub const fn haggle_discount(archetype: TraderArchetype, result: HaggleResult, gold_from_player: u32) -> u32 {
    let bonus = match (archetype, result) {
        (_, HaggleResult::Fail) | (TraderArchetype::Stingy, HaggleResult::Good) => 0,
        (TraderArchetype::Stingy, HaggleResult::Perfect) | (TraderArchetype::Normal, HaggleResult::Good) => 1,
        (TraderArchetype::Normal, HaggleResult::Perfect) | (TraderArchetype::Generous, HaggleResult::Good) => 2,
        (TraderArchetype::Generous, HaggleResult::Perfect) => 3,
    };
    let ceiling = gold_from_player.saturating_sub(1);
    if bonus < ceiling { bonus } else { ceiling }
}

/// A closed interval on the bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
}

impl Band {
    fn centered(width: f64, fraction: f64) -> Self {
        let center = width / 2.0;
        let half = width * fraction.clamp(0.0, 1.0) / 2.0;
        Self {
            left: center - half,
            right: center + half,
        }
    }

    fn contains(self, position: f64, tolerance: f64) -> bool {
        position >= self.left - tolerance && position <= self.right + tolerance
    }
}

/// The moving handle and its scoring bands.
///
/// The handle starts at the left bound moving right.
#[derive(Debug, Clone, PartialEq)]
pub struct HaggleBar {
    width: f64,
    speed: f64,
    position: f64,
    moving_right: bool,
    perfect: Band,
    good: Band,
    tolerance: f64,
}

impl HaggleBar {
    /// Build a bar for a trader of the given archetype.
    pub fn new(config: &HaggleConfig, archetype: TraderArchetype) -> Self {
        let width = sanitize(config.bar_width);
        let cross_time = sanitize(config.base_cross_time_secs);
        let speed = if cross_time > 0.0 {
            width / cross_time * sanitize(config.speed_multiplier(archetype))
        } else {
            0.0
        };

        Self {
            width,
            speed,
            position: 0.0,
            moving_right: true,
            perfect: Band::centered(width, config.perfect_fraction),
            good: Band::centered(width, config.good_fraction),
            tolerance: sanitize(config.tolerance),
        }
    }

    /// Width of the bar.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Handle speed in bar units per second.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Current handle position in `[0, width]`.
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Whether the handle is currently moving right.
    pub const fn moving_right(&self) -> bool {
        self.moving_right
    }

    /// The narrow band.
    pub const fn perfect_band(&self) -> Band {
        self.perfect
    }

    /// The wide band.
    pub const fn good_band(&self) -> Band {
        self.good
    }

    /// Move the handle forward by `dt_secs`, reflecting off both bounds.
    pub fn advance(&mut self, dt_secs: f64) {
        if self.width <= 0.0 || !dt_secs.is_finite() || dt_secs <= 0.0 {
            return;
        }
        let mut travel = (self.speed * dt_secs).rem_euclid(2.0 * self.width);

        // A travel below one full round trip reflects at most twice.
        for _ in 0..4 {
            if travel <= 0.0 {
                break;
            }
            let room = if self.moving_right {
                self.width - self.position
            } else {
                self.position
            };
            if travel < room {
                self.position = if self.moving_right {
                    self.position + travel
                } else {
                    self.position - travel
                };
                break;
            }
            travel -= room;
            self.position = if self.moving_right { self.width } else { 0.0 };
            self.moving_right = !self.moving_right;
        }
    }

    /// Where a freshly started handle is after `elapsed_secs`.
    pub fn position_at(&self, elapsed_secs: f64) -> f64 {
        if self.width <= 0.0 || !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return 0.0;
        }
        let travel = (self.speed * elapsed_secs).rem_euclid(2.0 * self.width);
        if travel <= self.width {
            travel
        } else {
            self.width.mul_add(2.0, -travel)
        }
    }

    /// Score a handle position.
    pub fn classify(&self, position: f64) -> HaggleResult {
        if self.perfect.contains(position, self.tolerance) {
            HaggleResult::Perfect
        } else if self.good.contains(position, self.tolerance) {
            HaggleResult::Good
        } else {
            HaggleResult::Fail
        }
    }

    /// Score the handle where it currently is.
    pub fn stop(&self) -> HaggleResult {
        self.classify(self.position)
    }

    /// Score a stop `elapsed_secs` after the handle started.
    pub fn stop_at(&self, elapsed_secs: f64) -> HaggleResult {
        self.classify(self.position_at(elapsed_secs))
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}
