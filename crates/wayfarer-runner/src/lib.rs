//! Remote decision service client and headless runner for Wayfarer.
//!
//! The decision service is an external HTTP process that tells an
//! AI-controlled player what to do each turn and how to answer traders.
//! This crate talks to it, turns its free-text answers into typed
//! decisions, and drives a headless run against a minimal world.
//!
//! ```text
//! TurnDriver --> DecisionClient --POST /decide, /trade--> service
//!            <-- parse (Rest / Reject on any failure) <--
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod parse;
pub mod runner;
pub mod world;

pub use client::DecisionClient;
pub use config::RunnerConfig;
pub use error::RunnerError;
pub use parse::{extract_json_object, parse_decision, parse_trade_action};
pub use runner::{HeadlessRunner, RunSummary};
pub use world::HeadlessWorld;
