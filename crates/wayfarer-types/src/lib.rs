//! Shared type definitions for the Wayfarer trade negotiation engine.
//!
//! This crate is the single source of truth for the values that cross crate
//! boundaries: trade offers, turn decisions, and the JSON payloads exchanged
//! with the external decision service.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for sessions and traders
//! - [`enums`] -- Resource kinds, trader archetypes, directions, decisions
//! - [`offer`] -- [`TradeOffer`] and its untrusted wire form [`ProposedOffer`]
//! - [`protocol`] -- Request/response payloads for the decision service

pub mod enums;
pub mod ids;
pub mod offer;
pub mod protocol;

// Re-export all public types at crate root for convenience.
pub use enums::{Decision, Difficulty, Direction, ResourceKind, TraderArchetype};
pub use ids::{SessionId, TraderId};
pub use offer::{ProposedOffer, TradeAction, TradeOffer};
pub use protocol::{
    DecisionRequest, DecisionResponse, MapPosition, PlayerStats, TileSummary,
    TradeDecisionRequest, TradeDecisionResponse, TraderInfo,
};
