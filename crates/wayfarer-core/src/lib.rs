//! Negotiation engine and turn loop for the Wayfarer game.
//!
//! This crate wires the pure trade logic from `wayfarer-trade` into a
//! playable loop: it loads configuration, asks decision sources what to do,
//! runs the negotiation state machine, and keeps async suspension points
//! scoped to a session so a torn-down session cannot apply stale results.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration loading ([`GameConfig`])
//! - [`decision`] -- Decision source traits and the human input queue
//! - [`driver`] -- Cancellable AI negotiation and haggle drivers
//! - [`negotiation`] -- The negotiation state machine ([`Negotiation`])
//! - [`turn`] -- Turn resolution against the wallet ([`TurnDriver`])

pub mod config;
pub mod decision;
pub mod driver;
pub mod negotiation;
pub mod turn;

// Re-export primary types at crate root for convenience.
pub use config::{ConfigError, GameConfig};
pub use decision::{
    DecisionError, HumanDecisionSource, HumanInputQueue, IdleDecisionSource, TradeDecisionSource,
    TurnDecisionSource, human_input,
};
pub use driver::{AiNegotiator, Cancellation, DriveOutcome, HaggleRound, HaggleStop, SessionLifetime};
pub use negotiation::{
    Effect, MAX_ROUNDS, Negotiation, NegotiationError, NegotiationRules, NegotiationSession,
    NegotiationState, PlayerMode, RejectReason, TradeOutcome, TradeReceipt,
};
pub use turn::{TileLookup, TurnDriver, TurnOutcome};
