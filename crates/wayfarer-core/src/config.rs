//! Configuration loading and typed config structures for the Wayfarer game.
//!
//! The canonical configuration lives in `wayfarer-config.yaml` at the project
//! root. Every section and field is optional; omitted values fall back to the
//! defaults below.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use wayfarer_trade::{HaggleConfig, LedgerCapacity, ResourceLedger, SpawnConfig};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `wayfarer-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Player wallet capacities and starting gold.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Trader spawning.
    #[serde(default)]
    pub traders: SpawnConfig,

    /// Negotiation limits and timers.
    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// Haggle minigame tunables.
    #[serde(default)]
    pub haggle: HaggleConfig,

    /// Turn resolution.
    #[serde(default)]
    pub turn: TurnConfig,

    /// Remote decision service.
    #[serde(default)]
    pub decision_service: DecisionServiceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Only the file is read; environment overrides are applied by the caller.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Player wallet configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PlayerConfig {
    /// Food capacity.
    #[serde(default = "default_max_resource")]
    pub max_food: u32,

    /// Water capacity.
    #[serde(default = "default_max_resource")]
    pub max_water: u32,

    /// Energy capacity.
    #[serde(default = "default_max_resource")]
    pub max_energy: u32,

    /// Gold in the wallet at the start of a run.
    #[serde(default = "default_starting_gold")]
    pub starting_gold: u32,
}

impl PlayerConfig {
    /// The configured capacities.
    pub const fn capacity(&self) -> LedgerCapacity {
        LedgerCapacity {
            max_food: self.max_food,
            max_water: self.max_water,
            max_energy: self.max_energy,
        }
    }

    /// A fresh wallet, full on every bounded resource.
    pub const fn new_ledger(&self) -> ResourceLedger {
        ResourceLedger::new(self.capacity(), self.starting_gold)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_food: default_max_resource(),
            max_water: default_max_resource(),
            max_energy: default_max_resource(),
            starting_gold: default_starting_gold(),
        }
    }
}

/// Negotiation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NegotiationConfig {
    /// Rounds allowed before a negotiation is forced to Rejected.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Delay before a successful AI trade closes itself.
    #[serde(default = "default_auto_close_ms")]
    pub auto_close_ms: u64,
}

impl NegotiationConfig {
    /// The auto-close delay as a [`Duration`].
    pub const fn auto_close(&self) -> Duration {
        Duration::from_millis(self.auto_close_ms)
    }
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            auto_close_ms: default_auto_close_ms(),
        }
    }
}

/// Turn resolution configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TurnConfig {
    /// Energy restored by resting.
    #[serde(default = "default_rest_energy_gain")]
    pub rest_energy_gain: u32,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            rest_energy_gain: default_rest_energy_gain(),
        }
    }
}

/// Remote decision service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecisionServiceConfig {
    /// Base URL; endpoints are `{base_url}/decide`, `/trade` and `/reset`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Hard per-call timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Whether an AI run starts by clearing the service's session memory.
    #[serde(default = "default_reset_on_start")]
    pub reset_on_start: bool,
}

impl DecisionServiceConfig {
    /// The request timeout as a [`Duration`].
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for DecisionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            reset_on_start: default_reset_on_start(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_max_resource() -> u32 {
    5
}

const fn default_starting_gold() -> u32 {
    10
}

const fn default_max_rounds() -> u32 {
    crate::negotiation::MAX_ROUNDS
}

const fn default_auto_close_ms() -> u64 {
    2000
}

const fn default_rest_energy_gain() -> u32 {
    2
}

fn default_base_url() -> String {
    String::from("http://localhost:8000")
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

const fn default_reset_on_start() -> bool {
    true
}

fn default_log_level() -> String {
    String::from("info")
}
