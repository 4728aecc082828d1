//! Configuration for the headless runner.
//!
//! Game rules come from `wayfarer-config.yaml`; the environment only says
//! where that file is, how long to run, and overrides the decision service
//! settings for a particular deployment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use wayfarer_core::GameConfig;

use crate::error::RunnerError;

/// Runner configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Path to the YAML game configuration.
    pub config_path: PathBuf,
    /// Decision service base URL, overriding the YAML value.
    pub service_url: Option<String>,
    /// Per-call decision deadline, overriding the YAML value.
    pub decision_timeout: Option<Duration>,
    /// Whether to reset the service's session memory before the first turn.
    pub reset_on_start: Option<bool>,
    /// Number of turns to play before exiting.
    pub turn_limit: u32,
    /// Seed for trader spawning; random when unset.
    pub world_seed: Option<u64>,
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `WAYFARER_CONFIG` -- path to the game config (default `wayfarer-config.yaml`)
    /// - `DECISION_SERVICE_URL` -- decision service base URL
    /// - `DECISION_TIMEOUT_MS` -- per-call deadline in milliseconds (YAML default 30000)
    /// - `RESET_ON_START` -- clear the service's memory before playing (`true`/`false`)
    /// - `TURN_LIMIT` -- turns to play (default 50)
    /// - `WORLD_SEED` -- trader spawning seed
    pub fn from_env() -> Result<Self, RunnerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RunnerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = lookup("WAYFARER_CONFIG").map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        let service_url = lookup("DECISION_SERVICE_URL").filter(|url| !url.trim().is_empty());
        let decision_timeout = parse_var::<u64, _>(&lookup, "DECISION_TIMEOUT_MS")?.map(Duration::from_millis);
        let reset_on_start = parse_var(&lookup, "RESET_ON_START")?;
        let turn_limit = parse_var(&lookup, "TURN_LIMIT")?.unwrap_or(DEFAULT_TURN_LIMIT);
        let world_seed = parse_var(&lookup, "WORLD_SEED")?;

        Ok(Self {
            config_path,
            service_url,
            decision_timeout,
            reset_on_start,
            turn_limit,
            world_seed,
        })
    }

    /// Fold the environment overrides into a loaded game configuration.
    pub fn apply_to(&self, game: &mut GameConfig) {
        if let Some(url) = &self.service_url {
            game.decision_service.base_url.clone_from(url);
        }
        if let Some(timeout) = self.decision_timeout {
            game.decision_service.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(reset) = self.reset_on_start {
            game.decision_service.reset_on_start = reset;
        }
    }
}

const DEFAULT_CONFIG_PATH: &str = "wayfarer-config.yaml";
const DEFAULT_TURN_LIMIT: u32 = 50;

/// Read and parse an optional variable.
fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, RunnerError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| RunnerError::Config(format!("invalid {name}: {e}")))
        })
        .transpose()
}
