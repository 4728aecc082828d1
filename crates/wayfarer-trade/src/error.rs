//! Error types for the wayfarer-trade crate.
//!
//! All wallet and stock mutations return typed errors rather than
//! panicking. A failed mutation leaves the wallet or trader untouched.

use wayfarer_types::ResourceKind;

/// Errors raised by [`ResourceLedger`](crate::ResourceLedger) mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The player cannot pay the gold the trade asks for.
    #[error("insufficient gold: trade needs {needed} but wallet holds {available}")]
    InsufficientGold {
        /// Gold the trade costs.
        needed: u32,
        /// Gold in the wallet.
        available: u32,
    },

    /// Receiving the goods would push a resource past its capacity.
    #[error("{kind:?} over capacity: {current} + {adding} exceeds {capacity}")]
    OverCapacity {
        /// The resource that would overflow.
        kind: ResourceKind,
        /// Current amount.
        current: u32,
        /// Amount the trade adds.
        adding: u32,
        /// The wallet's capacity for this resource.
        capacity: u32,
    },

    /// The offer uses a field the protocol does not support.
    #[error("unsupported trade field {field} = {value}")]
    UnsupportedField {
        /// Name of the offending field.
        field: &'static str,
        /// Its non-zero value.
        value: u32,
    },

    /// An arithmetic overflow occurred while computing a new balance.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: &'static str,
    },
}

/// Errors raised when settling a trade against a trader's stock.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    /// The trader does not hold what the offer asks for.
    #[error("trader out of {kind:?}: offer wants {requested} but stock is {stock}")]
    InsufficientStock {
        /// The good that is short.
        kind: ResourceKind,
        /// Amount requested by the offer.
        requested: u32,
        /// Amount in stock.
        stock: u32,
    },

    /// The player's side of the trade failed.
    #[error("wallet rejected trade: {0}")]
    Ledger(#[from] LedgerError),

    /// An arithmetic overflow occurred while updating stock.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: &'static str,
    },
}
