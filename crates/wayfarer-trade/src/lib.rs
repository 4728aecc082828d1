//! Wallet, trader, and haggling logic for the Wayfarer game.
//!
//! This crate contains everything about a trade that can be decided without
//! I/O. It sits between `wayfarer-types` (the data) and `wayfarer-core`
//! (the negotiation state machine that drives these functions).
//!
//! # Modules
//!
//! - [`config`] -- Tunables for haggling and trader spawning
//! - [`error`] -- Error types ([`LedgerError`], [`TradeError`])
//! - [`haggle`] -- The timing minigame and its gold discount table
//! - [`ledger`] -- The player's wallet ([`ResourceLedger`])
//! - [`policy`] -- Trader acceptance and counter-offer rules
//! - [`trader`] -- Trader stock and spawning ([`Trader`])
//! - [`validation`] -- Guard for untrusted offers from the decision service

pub mod config;
pub mod error;
pub mod haggle;
pub mod ledger;
pub mod policy;
pub mod trader;
pub mod validation;

// Re-export primary types at crate root for convenience.
pub use config::{HaggleConfig, SpawnConfig, StockRange};
pub use error::{LedgerError, TradeError};
pub use haggle::{HaggleBar, HaggleResult, haggle_discount};
pub use ledger::{LedgerCapacity, ResourceLedger};
pub use policy::{PolicyVerdict, counter_offer, evaluate_offer, respond};
pub use trader::Trader;
pub use validation::{CounterViolation, validate_acceptance, validate_counter};
