//! Headless entry point for AI-controlled Wayfarer runs.
//!
//! Loads the game configuration, optionally clears the decision service's
//! memory, spawns one trader on a trading post and plays `TURN_LIMIT`
//! turns with every decision coming from the service. Failures of the
//! service never stop the run; they degrade to resting or rejecting.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wayfarer_core::{GameConfig, SessionLifetime};
use wayfarer_runner::{DecisionClient, HeadlessRunner, HeadlessWorld, RunnerConfig};
use wayfarer_trade::Trader;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the HTTP
/// client cannot be built.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runner_config = RunnerConfig::from_env()?;
    let mut game = if runner_config.config_path.exists() {
        GameConfig::from_file(&runner_config.config_path)?
    } else {
        GameConfig::default()
    };
    runner_config.apply_to(&mut game);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&game.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        config_path = %runner_config.config_path.display(),
        base_url = game.decision_service.base_url,
        timeout_ms = game.decision_service.request_timeout_ms,
        turn_limit = runner_config.turn_limit,
        "wayfarer-runner starting"
    );

    let client = DecisionClient::new(&game.decision_service)?;
    if game.decision_service.reset_on_start {
        if let Err(e) = client.reset_session().await {
            warn!(error = %e, "Session reset failed, continuing with stale memory");
        }
    }

    let seed = runner_config.world_seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let trader = Trader::spawn(&mut rng, game.traders.difficulty, &game.traders);
    info!(
        seed,
        trader_id = %trader.id(),
        archetype = %trader.archetype(),
        food_stock = trader.food_stock(),
        water_stock = trader.water_stock(),
        "Trader spawned on trading post"
    );

    let (lifetime, cancellation) = SessionLifetime::new();
    let mut runner = HeadlessRunner::new(&game, client, HeadlessWorld::new(trader));
    let summary = runner.run(runner_config.turn_limit, &cancellation).await;
    lifetime.end();

    info!(?summary, "wayfarer-runner finished");
    Ok(())
}
