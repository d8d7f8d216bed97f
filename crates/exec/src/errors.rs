//! Error types for the duty executors.

use chrono::{DateTime, Utc};
use lsd_chain_client::ClientError;
use lsd_operation_sm::state::Failure;
use lsd_planner::PlanError;
use lsd_primitives::types::Amount;
use thiserror::Error;

/// Errors that can occur while planning an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The account needed on the given chain is not connected.
    #[error("wallet not connected: missing {0} account")]
    WalletNotConnected(&'static str),

    /// A channel or contract needed by the operation is not configured.
    #[error("no route configured: {0}")]
    MissingRoute(String),

    /// The sender cannot cover the operation.
    #[error("insufficient {denom} balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Denomination that is short.
        denom: String,
        /// Required amount.
        required: Amount,
        /// Available amount.
        available: Amount,
    },

    /// The sender's fee-denom balance cannot cover the relayer fee plus the reserve.
    #[error("insufficient fee balance: required {required}, available {available}")]
    InsufficientFeeBalance {
        /// Fee plus reserve.
        required: Amount,
        /// Available amount.
        available: Amount,
    },

    /// The account may not tokenize shares.
    #[error("account is locked and cannot tokenize shares")]
    TokenizeLocked,

    /// The account may tokenize shares again once the lock expires.
    #[error("tokenization will be allowed at {0}")]
    TokenizeLockExpiring(DateTime<Utc>),

    /// The user's delegation to the target validator is a validator bond.
    #[error("validator bond is not allowed for tokenize shares")]
    ValidatorBond,

    /// No unstake record has matured.
    #[error("nothing to withdraw")]
    NothingToWithdraw,

    /// The current time cannot be expressed as an IBC timeout.
    #[error("ibc timeout out of range")]
    TimeoutOutOfRange,

    /// Planning logic refused the request.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// A chain query failed.
    #[error("query failed: {0}")]
    Client(#[from] ClientError),
}

impl ExecError {
    /// Whether the error is a precondition on the user's input or holdings, as opposed to a
    /// failure of the planning process itself.
    pub const fn is_precondition(&self) -> bool {
        match self {
            Self::Plan(err) => matches!(
                err,
                PlanError::ZeroAmount
                    | PlanError::NoEligibleValidator { .. }
                    | PlanError::InsufficientDelegation { .. }
            ),
            Self::Client(_) | Self::TimeoutOutOfRange => false,
            _ => true,
        }
    }

    /// The failure recorded by the state machine.
    pub fn into_failure(self) -> Failure {
        let reason = self.to_string();
        if self.is_precondition() {
            Failure::Precondition { reason }
        } else {
            Failure::Planning { reason }
        }
    }
}

/// Result alias for executor internals.
pub type ExecResult<T> = Result<T, ExecError>;
