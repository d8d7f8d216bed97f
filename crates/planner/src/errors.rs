//! Errors produced while planning messages.

use lsd_primitives::types::{Address, Amount};
use thiserror::Error;

/// Reasons a plan cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The requested amount is zero.
    #[error("amount must be positive")]
    ZeroAmount,

    /// No validator can accept the requested amount of liquid stake.
    #[error("no validator can accept {requested} of liquid stake")]
    NoEligibleValidator {
        /// The requested amount.
        requested: Amount,
    },

    /// The user's delegations do not cover the requested amount.
    #[error("insufficient delegation: requested {requested}, delegated {available}")]
    InsufficientDelegation {
        /// The requested amount.
        requested: Amount,
        /// The sum of all delegations.
        available: Amount,
    },

    /// A validator referenced by the plan is unknown.
    #[error("validator {0} not found")]
    ValidatorNotFound(Address),

    /// A validator has no delegator shares, so its share price is undefined.
    #[error("validator {0} has no delegator shares")]
    EmptyValidator(Address),

    /// Redeeming a share token would yield no tokens.
    #[error("shares {0} are worth nothing")]
    DustShares(String),

    /// No balance exists for the share token of a freshly created record.
    #[error("tokenize share balance {0} not found")]
    ShareBalanceNotFound(String),

    /// Fewer tokenize-share records exist than tokenize messages were confirmed.
    #[error("tokenize share records do not match: expected {expected}, found {found}")]
    RecordCountMismatch {
        /// Number of records expected.
        expected: usize,
        /// Number of records found.
        found: usize,
    },

    /// An intermediate amount does not fit in 128 bits.
    #[error("amount overflow")]
    Overflow,

    /// A contract message could not be encoded.
    #[error("encode: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Result alias for planning functions.
pub type PlanResult<T> = Result<T, PlanError>;
